//! Scalar evaluation: normalize, evaluate once, format for display

use crate::engine::Engine;
use crate::normalize::{normalize_text, normalize_tree, NormalizeStrategy};
use crate::session::Session;
use abacus_core::{AbacusError, AngleMode, Number};
use tracing::{debug, warn};

/// Significant digits shown for a result
pub const DISPLAY_PRECISION: u32 = 14;

/// Outcome of one evaluation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    Success { formatted_value: String },
    Failure { kind: FailureKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    SyntaxError,
}

impl FailureKind {
    /// Text shown to the user; engine details go to the log only
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::SyntaxError => "Syntax Error",
        }
    }
}

pub struct ScalarEvaluator {
    engine: Engine,
    strategy: NormalizeStrategy,
    display_precision: u32,
}

impl ScalarEvaluator {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            strategy: NormalizeStrategy::default(),
            display_precision: DISPLAY_PRECISION,
        }
    }

    pub fn with_strategy(mut self, strategy: NormalizeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_display_precision(mut self, sigfigs: u32) -> Self {
        self.display_precision = sigfigs;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn strategy(&self) -> NormalizeStrategy {
        self.strategy
    }

    /// Evaluate and format without touching any session state
    pub fn evaluate_scalar(&self, expression: &str, mode: AngleMode) -> Result<String, AbacusError> {
        let value = self.evaluate_number(expression, mode)?;
        Ok(Engine::format(&value, self.display_precision))
    }

    fn evaluate_number(&self, expression: &str, mode: AngleMode) -> Result<Number, AbacusError> {
        match (mode, self.strategy) {
            (AngleMode::Rad, _) => self.engine.evaluate(expression),
            (AngleMode::Deg, NormalizeStrategy::Textual) => {
                let rewritten = normalize_text(expression);
                debug!(%rewritten, "normalized for degree mode");
                self.engine.evaluate(&rewritten)
            }
            (AngleMode::Deg, NormalizeStrategy::Syntax) => {
                let expr = normalize_tree(self.engine.parse(expression)?);
                self.engine
                    .evaluate_expr(&expr)
                    .map_err(|e| e.with_formula(expression))
            }
        }
    }

    /// Evaluate against a session. Blank input is ignored (`None`); any
    /// other attempt clears the displayed error first. Success updates the
    /// result, `last_result` and history; failure only sets the error.
    pub fn evaluate(&self, expression: &str, session: &mut Session) -> Option<EvaluationResult> {
        if expression.trim().is_empty() {
            return None;
        }
        session.error = None;

        match self.evaluate_scalar(expression, session.mode) {
            Ok(formatted_value) => {
                session.result = Some(formatted_value.clone());
                session.last_result = Some(formatted_value.clone());
                session.history.append(expression, formatted_value.clone());
                Some(EvaluationResult::Success { formatted_value })
            }
            Err(err) => {
                warn!(error = %err, expression, "evaluation failed");
                let kind = FailureKind::SyntaxError;
                session.error = Some(kind.message().to_string());
                Some(EvaluationResult::Failure { kind })
            }
        }
    }
}

impl Default for ScalarEvaluator {
    fn default() -> Self {
        Self::new(Engine::new())
    }
}
