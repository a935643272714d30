//! Gemini `generateContent` client

use crate::{explain_prompt, solve_prompt, AssistError, Assistant, ExplanationRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection and sampling settings (the `[assistant]` config section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub explain_model: String,
    pub solver_model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub thinking_budget: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            explain_model: "gemini-3-flash-preview".into(),
            solver_model: "gemini-3-pro-preview".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: 30,
            temperature: 0.7,
            top_p: 0.95,
            max_output_tokens: 500,
            thinking_budget: 2000,
        }
    }
}

// --- wire format ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GenerateResponse {
    /// Answer text of the first candidate, thought summaries excluded
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Blocking Gemini client
pub struct GeminiAssistant {
    config: GeminiConfig,
    api_key: String,
    agent: ureq::Agent,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Read the API key from the environment variable named in the config
    pub fn from_env(config: GeminiConfig) -> Result<Self, AssistError> {
        let key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AssistError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(config, key))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn explain_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![user_content(prompt)],
            generation_config: GenerationConfig {
                temperature: Some(self.config.temperature),
                top_p: Some(self.config.top_p),
                max_output_tokens: Some(self.config.max_output_tokens),
                ..GenerationConfig::default()
            },
        }
    }

    fn solve_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![user_content(prompt)],
            generation_config: GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                }),
                ..GenerationConfig::default()
            },
        }
    }

    fn generate(&self, model: &str, body: &GenerateRequest<'_>) -> Result<String, AssistError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        );
        debug!(%model, "sending generateContent request");

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .send_json(body)
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => AssistError::Status {
                    code,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => AssistError::Transport(transport.to_string()),
            })?;

        let parsed: GenerateResponse = response
            .into_json()
            .map_err(|e| AssistError::Decode(e.to_string()))?;
        parsed.text().ok_or(AssistError::EmptyResponse)
    }
}

fn user_content(prompt: &str) -> Content<'_> {
    Content {
        role: "user",
        parts: vec![RequestPart { text: prompt }],
    }
}

impl Assistant for GeminiAssistant {
    fn explain(&self, request: &ExplanationRequest) -> Result<String, AssistError> {
        let prompt = explain_prompt(request);
        self.generate(&self.config.explain_model, &self.explain_body(&prompt))
    }

    fn solve_word_problem(&self, problem: &str) -> Result<String, AssistError> {
        let prompt = solve_prompt(problem);
        self.generate(&self.config.solver_model, &self.solve_body(&prompt))
    }
}
