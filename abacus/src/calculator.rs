//! Keypad-level calculator controller
//!
//! Owns the expression buffer, the session and the plot state, and maps
//! each user action onto the scalar evaluator or the sampler.

use crate::engine::Engine;
use crate::normalize::NormalizeStrategy;
use crate::sampler::{FunctionSampler, SampleOutcome, SamplePoint};
use crate::scalar::{EvaluationResult, ScalarEvaluator};
use crate::session::Session;
use abacus_core::AngleMode;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use uuid::Uuid;

/// Keypad token that inserts the last result
pub const ANS_TOKEN: &str = "ans";

/// Expression/result pair handed to the explanation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationRequest {
    pub expression: String,
    pub result: String,
}

/// What the plot panel shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotState {
    /// Last good sample set; kept when a later sweep finds no valid points
    pub points: Vec<SamplePoint>,
    /// Shown instead of the chart when set
    pub message: Option<String>,
}

pub struct Calculator {
    evaluator: ScalarEvaluator,
    sampler: FunctionSampler,
    session: Session,
    expression: String,
    plot: PlotState,
}

impl Calculator {
    pub fn new(engine: Engine) -> Self {
        Self {
            evaluator: ScalarEvaluator::new(engine.clone()),
            sampler: FunctionSampler::new(engine),
            session: Session::default(),
            expression: String::new(),
            plot: PlotState::default(),
        }
    }

    pub fn with_mode(mut self, mode: AngleMode) -> Self {
        self.session.mode = mode;
        self
    }

    pub fn with_strategy(mut self, strategy: NormalizeStrategy) -> Self {
        self.evaluator = self.evaluator.with_strategy(strategy);
        self
    }

    pub fn with_display_precision(mut self, sigfigs: u32) -> Self {
        self.evaluator = self.evaluator.with_display_precision(sigfigs);
        self
    }

    pub fn engine(&self) -> &Engine {
        self.evaluator.engine()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.expression = text.into();
    }

    pub fn mode(&self) -> AngleMode {
        self.session.mode
    }

    pub fn set_mode(&mut self, mode: AngleMode) {
        self.session.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> AngleMode {
        self.session.mode = self.session.mode.toggled();
        self.session.mode
    }

    /// Append a key's text to the buffer
    pub fn input(&mut self, token: &str) {
        self.session.error = None;
        if token == ANS_TOKEN {
            if let Some(last) = &self.session.last_result {
                self.expression.push_str(last);
            }
        } else {
            self.expression.push_str(token);
        }
    }

    /// Clear buffer, displayed result and error. History and `ans` survive.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.session.result = None;
        self.session.error = None;
    }

    pub fn delete(&mut self) {
        self.expression.pop();
    }

    pub fn calculate(&mut self) -> Option<EvaluationResult> {
        self.evaluator.evaluate(&self.expression, &mut self.session)
    }

    /// Evaluate a typed line: whole-word `ans` becomes the last result
    pub fn evaluate_line(&mut self, line: &str) -> Option<EvaluationResult> {
        self.expression = expand_ans(line.trim(), self.session.last_result.as_deref());
        self.calculate()
    }

    /// Restore a past calculation into the buffer and display
    pub fn select_history(&mut self, id: Uuid) -> bool {
        let Some(entry) = self.session.history.get(id) else {
            return false;
        };
        self.expression = entry.expression.clone();
        self.session.result = Some(entry.result.clone());
        self.session.error = None;
        true
    }

    pub fn clear_history(&mut self) {
        self.session.history.clear();
    }

    /// Resample the current buffer
    pub fn plot(&mut self) -> &PlotState {
        let outcome = self.sampler.sample(&self.expression);
        self.plot.message = outcome.user_message().map(str::to_string);
        match outcome {
            SampleOutcome::Ready(points) => self.plot.points = points,
            SampleOutcome::NoValidPoints => {}
            SampleOutcome::NotApplicable | SampleOutcome::CompileFailed { .. } => {
                self.plot.points.clear();
            }
        }
        &self.plot
    }

    pub fn plot_state(&self) -> &PlotState {
        &self.plot
    }

    /// The pair to explain, once there is a result on display
    pub fn explanation_request(&self) -> Option<ExplanationRequest> {
        let result = self.session.result.as_ref()?;
        Some(ExplanationRequest {
            expression: self.expression.clone(),
            result: result.clone(),
        })
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Engine::new())
    }
}

fn ans_pattern() -> Option<&'static Regex> {
    static ANS: OnceLock<Option<Regex>> = OnceLock::new();
    ANS.get_or_init(|| Regex::new(r"\bans\b").ok()).as_ref()
}

/// Replace whole-word `ans` with the last result (left alone when there is none)
pub fn expand_ans(text: &str, last_result: Option<&str>) -> String {
    match (ans_pattern(), last_result) {
        (Some(re), Some(last)) => re
            .replace_all(text, regex::NoExpand(&format!("({})", last)))
            .into_owned(),
        _ => text.to_string(),
    }
}
