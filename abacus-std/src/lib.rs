//! Abacus Standard Library

pub mod functions;
pub mod constants;

use abacus_plugin::PluginRegistry;

/// Load standard library into registry
pub fn load_standard_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::Sqrt)
        .with_function(functions::Ln)
        .with_function(functions::Log)
        .with_function(functions::Log10)
        .with_function(functions::Exp)
        .with_function(functions::Pow)
        .with_function(functions::Abs)
        .with_function(functions::Sin)
        .with_function(functions::Cos)
        .with_function(functions::Tan)
        .with_constant(constants::pi())
        .with_constant(constants::pi_ascii())
        .with_constant(constants::e())
}

/// Create registry with standard library
pub fn standard_registry() -> PluginRegistry {
    load_standard_library(PluginRegistry::new())
}
