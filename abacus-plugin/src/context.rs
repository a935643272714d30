//! Evaluation Context

use abacus_core::{AbacusError, Number, WORKING_PRECISION};
use crate::PluginRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluation context passed to plugins
///
/// Rebuilt for every evaluation; nothing here outlives a single call.
pub struct EvalContext {
    pub precision: u32,
    pub variables: HashMap<String, Number>,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            precision: WORKING_PRECISION,
            variables: HashMap::new(),
            registry,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_variables(mut self, vars: HashMap<String, Number>) -> Self {
        self.variables = vars;
        self
    }

    /// Resolve an identifier: bound variables first (case-sensitive), then
    /// registry constants (case-insensitive).
    pub fn get_var(&self, name: &str) -> Result<Number, AbacusError> {
        if let Some(value) = self.variables.get(name) {
            return Ok(value.clone());
        }
        if let Some(constant) = self.registry.get_constant(name) {
            return Ok(constant.value(self.precision));
        }
        Err(AbacusError::undefined_var(name))
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: Number) {
        self.variables.insert(name.into(), value);
    }

    /// Call a registered function by name
    pub fn call(&self, name: &str, args: &[Number]) -> Result<Number, AbacusError> {
        self.registry.call_function(name, args, self)
    }
}
