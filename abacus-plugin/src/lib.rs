//! Abacus Plugin System
//!
//! Functions and constants are registered in a `PluginRegistry` and looked
//! up by name (case-insensitively) at evaluation time.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::{PluginRegistry, ConstantDef};
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, ConstantDef, EvalContext};
    pub use abacus_core::prelude::*;
}
