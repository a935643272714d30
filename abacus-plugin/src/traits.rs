//! Plugin traits

use abacus_core::{AbacusError, Number};
use crate::EvalContext;
use serde::Serialize;

/// Metadata about a function argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self { name, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, description, optional: true, default: Some(default) }
    }
}

/// Metadata for a function plugin
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

impl FunctionMeta {
    /// Number of arguments that must be supplied
    pub fn min_args(&self) -> usize {
        self.args.iter().filter(|a| !a.optional).count()
    }

    pub fn max_args(&self) -> usize {
        self.args.len()
    }

    /// Reject calls whose argument count the signature cannot accept
    pub fn check_arity(&self, got: usize) -> Result<(), AbacusError> {
        let (min, max) = (self.min_args(), self.max_args());
        if got >= min && got <= max {
            return Ok(());
        }
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        Err(AbacusError::arg_count(self.name, &expected, got)
            .with_suggestion(format!("Usage: {}", self.usage)))
    }
}

/// Pure numeric function
///
/// Arity is checked by the registry before `call` runs, so implementations
/// may index `args` up to `meta().min_args()` without bounds checks.
pub trait FunctionPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError>;
}
