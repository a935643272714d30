//! Function sampling for plots
//!
//! A one-variable expression is compiled once and evaluated at
//! `x = -10, -9.5, ..., 10`. Samples that error or are not finite are
//! dropped; only an empty sweep is reported.

use crate::ast::Expr;
use crate::engine::{CompiledExpression, Engine};
use abacus_core::Number;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The free identifier bound by the sweep
pub const PLOT_VARIABLE: &str = "x";

/// Sweep runs over `k / 2` for `k` in `-HALF_STEPS..=HALF_STEPS`
const HALF_STEPS: i64 = 20;

pub const PROMPT_MESSAGE: &str = "Enter a function with 'x' (e.g., sin(x) * x) to visualize it here.";
pub const COMPILE_FAILED_MESSAGE: &str = "Invalid function for graphing (use 'x')";
pub const NO_VALID_POINTS_MESSAGE: &str = "Function returned no valid points";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// No plot variable; show the prompt
    NotApplicable,
    Ready(Vec<SamplePoint>),
    NoValidPoints,
    /// `message` carries the engine's diagnostic
    CompileFailed { message: String },
}

impl SampleOutcome {
    /// Text shown in place of a chart
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            SampleOutcome::NotApplicable => Some(PROMPT_MESSAGE),
            SampleOutcome::Ready(_) => None,
            SampleOutcome::NoValidPoints => Some(NO_VALID_POINTS_MESSAGE),
            SampleOutcome::CompileFailed { .. } => Some(COMPILE_FAILED_MESSAGE),
        }
    }
}

pub struct FunctionSampler {
    engine: Engine,
}

impl FunctionSampler {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Run the full pipeline. Sampling always works in radians.
    pub fn sample(&self, expression: &str) -> SampleOutcome {
        let text = expression.trim();
        if text.is_empty() {
            return SampleOutcome::NotApplicable;
        }

        let expr = match self.engine.parse(text) {
            Ok(expr) => expr,
            Err(err) if text.to_lowercase().contains(PLOT_VARIABLE) => {
                debug!(error = %err, "plot expression does not parse");
                return SampleOutcome::CompileFailed { message: err.to_string() };
            }
            Err(_) => return SampleOutcome::NotApplicable,
        };

        let Some(variable) = self.plot_variable(&expr) else {
            return SampleOutcome::NotApplicable;
        };

        let compiled = match self.engine.compile_expr(expr) {
            Ok(compiled) => compiled,
            Err(err) => {
                debug!(error = %err, "plot expression does not compile");
                return SampleOutcome::CompileFailed { message: err.to_string() };
            }
        };

        let points = self.sweep(&compiled, &variable);
        debug!(points = points.len(), "sweep finished");
        if points.is_empty() {
            SampleOutcome::NoValidPoints
        } else {
            SampleOutcome::Ready(points)
        }
    }

    /// Spelling of the plot variable used in the expression, if any
    fn plot_variable(&self, expr: &Expr) -> Option<String> {
        let registry = self.engine.registry();
        expr.free_variables()
            .into_iter()
            .filter(|name| !registry.is_constant(name))
            .find(|name| name.eq_ignore_ascii_case(PLOT_VARIABLE))
    }

    fn sweep(&self, compiled: &CompiledExpression, variable: &str) -> Vec<SamplePoint> {
        let mut bindings = HashMap::new();
        let mut points = Vec::with_capacity((2 * HALF_STEPS + 1) as usize);

        for k in -HALF_STEPS..=HALF_STEPS {
            bindings.insert(variable.to_string(), Number::from_ratio(k, 2));
            let x = k as f64 / 2.0;

            let y = match compiled.evaluate(&bindings) {
                Ok(value) => value.to_f64(),
                Err(err) => {
                    trace!(x, error = %err, "sample dropped");
                    continue;
                }
            };
            match y {
                Some(y) if y.is_finite() => points.push(SamplePoint { x, y: round4(y) }),
                _ => trace!(x, "sample not finite"),
            }
        }
        points
    }
}

impl Default for FunctionSampler {
    fn default() -> Self {
        Self::new(Engine::new())
    }
}

/// Round to 4 decimal places through the decimal rendering
fn round4(y: f64) -> f64 {
    format!("{:.4}", y).parse().unwrap_or(y)
}
