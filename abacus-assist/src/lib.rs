//! Abacus Assist - remote language-model help for calculator results
//!
//! The calculator core only hands over an `(expression, result)` pair.
//! Everything here is a black box from its point of view: an `Assistant`
//! returns prose or an error, and the `*_or_fallback` helpers turn every
//! error into a fixed user-facing sentence.

mod gemini;

pub use gemini::{GeminiAssistant, GeminiConfig};
pub use abacus::ExplanationRequest;

use thiserror::Error;
use tracing::warn;

pub const EXPLAIN_EMPTY_FALLBACK: &str = "Could not generate an explanation.";
pub const EXPLAIN_UNAVAILABLE_FALLBACK: &str =
    "The AI assistant is currently unavailable. Please check your connection.";
pub const SOLVE_EMPTY_FALLBACK: &str = "Failed to solve the problem.";
pub const SOLVE_UNAVAILABLE_FALLBACK: &str = "Error solving the problem.";

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("response contained no text")]
    EmptyResponse,
}

/// Text-in, text-out explanation service
pub trait Assistant {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, AssistError>;
    fn solve_word_problem(&self, problem: &str) -> Result<String, AssistError>;
}

pub fn explain_prompt(request: &ExplanationRequest) -> String {
    format!(
        "Explain this mathematical expression and its result in a concise, scientific manner: \
         Expression: {}, Result: {}. Include properties of the functions used if relevant.",
        request.expression, request.result
    )
}

pub fn solve_prompt(problem: &str) -> String {
    format!(
        "You are a high-level mathematical assistant. Solve this word problem step-by-step: {}",
        problem
    )
}

/// Explanation text, or the fixed fallback sentence
pub fn explain_or_fallback(assistant: &dyn Assistant, request: &ExplanationRequest) -> String {
    explanation_text(assistant.explain(request))
}

/// Worked solution, or the fixed fallback sentence
pub fn solve_or_fallback(assistant: &dyn Assistant, problem: &str) -> String {
    solution_text(assistant.solve_word_problem(problem))
}

/// Map any explanation outcome to display text, including failures that
/// happen before a request is sent (such as a missing key)
pub fn explanation_text(outcome: Result<String, AssistError>) -> String {
    with_fallback(outcome, EXPLAIN_EMPTY_FALLBACK, EXPLAIN_UNAVAILABLE_FALLBACK)
}

pub fn solution_text(outcome: Result<String, AssistError>) -> String {
    with_fallback(outcome, SOLVE_EMPTY_FALLBACK, SOLVE_UNAVAILABLE_FALLBACK)
}

fn with_fallback(outcome: Result<String, AssistError>, empty: &str, unavailable: &str) -> String {
    match outcome {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(AssistError::EmptyResponse) => empty.to_string(),
        Err(err) => {
            warn!(error = %err, "assistant request failed");
            unavailable.to_string()
        }
    }
}
