//! Evaluation engine
//!
//! Parse + evaluate in one step, or compile once and evaluate many times
//! with different variable bindings.

use crate::ast::Expr;
use crate::eval::Evaluator;
use crate::parser::parse_expr;
use abacus_core::{AbacusError, Number, MAX_PRECISION, WORKING_PRECISION};
use abacus_plugin::{EvalContext, PluginRegistry};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Expression engine over an immutable function registry
#[derive(Clone)]
pub struct Engine {
    registry: Arc<PluginRegistry>,
    precision: u32,
}

impl Engine {
    /// Engine with the standard library at working precision
    pub fn new() -> Self {
        Self::with_registry(Arc::new(abacus_std::standard_registry()))
    }

    pub fn with_registry(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            precision: WORKING_PRECISION,
        }
    }

    /// Significant digits for evaluation, capped at `MAX_PRECISION`
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.clamp(1, MAX_PRECISION);
        self
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn parse(&self, text: &str) -> Result<Expr, AbacusError> {
        parse_expr(text)
    }

    /// Parse and evaluate with no variable bindings
    pub fn evaluate(&self, text: &str) -> Result<Number, AbacusError> {
        let expr = self.parse(text)?;
        self.evaluate_expr(&expr).map_err(|e| e.with_formula(text))
    }

    pub fn evaluate_expr(&self, expr: &Expr) -> Result<Number, AbacusError> {
        self.evaluate_with(expr, HashMap::new())
    }

    fn evaluate_with(&self, expr: &Expr, bindings: HashMap<String, Number>) -> Result<Number, AbacusError> {
        let ctx = EvalContext::new(self.registry.clone())
            .with_precision(self.precision)
            .with_variables(bindings);
        let value = Evaluator::new().eval_expr(expr, &ctx)?;
        debug!(result = %value.to_sigfigs(20), "evaluated expression");
        Ok(value)
    }

    /// Parse and resolve function names once
    pub fn compile(&self, text: &str) -> Result<CompiledExpression, AbacusError> {
        let expr = self.parse(text)?;
        self.compile_expr(expr).map_err(|e| e.with_formula(text))
    }

    /// Resolve function names and argument counts of an already parsed tree
    pub fn compile_expr(&self, expr: Expr) -> Result<CompiledExpression, AbacusError> {
        for (name, argc) in expr.function_calls() {
            let f = self
                .registry
                .get_function(&name)
                .ok_or_else(|| self.registry.unknown_function(&name))?;
            f.meta().check_arity(argc)?;
        }
        Ok(CompiledExpression {
            expr,
            engine: self.clone(),
        })
    }

    /// Render with `sigfigs` significant digits
    pub fn format(value: &Number, sigfigs: u32) -> String {
        value.to_sigfigs(sigfigs)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed, name-resolved expression ready for repeated evaluation
#[derive(Clone)]
pub struct CompiledExpression {
    expr: Expr,
    engine: Engine,
}

impl CompiledExpression {
    /// Evaluate with the given bindings; fails if a free variable is unbound
    /// or the value errors numerically
    pub fn evaluate(&self, bindings: &HashMap<String, Number>) -> Result<Number, AbacusError> {
        self.engine.evaluate_with(&self.expr, bindings.clone())
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Free identifiers that are not registry constants
    pub fn unbound_variables(&self) -> BTreeSet<String> {
        let registry = self.engine.registry();
        self.expr
            .free_variables()
            .into_iter()
            .filter(|name| !registry.is_constant(name))
            .collect()
    }
}

impl std::fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("expr", &self.expr)
            .field("precision", &self.engine.precision)
            .finish()
    }
}
