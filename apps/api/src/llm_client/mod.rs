//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All generation goes through the `TextGenerator` trait defined here.
//!
//! Nothing raised inside this module crosses its boundary: every failure
//! (missing credential, network, quota, timeout, malformed body) is folded
//! into `GenerationOutcome::Failed`. One attempt per call; no retries.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GenerationConfig;

pub mod parser;
pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no generation credential configured")]
    MissingCredential,

    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Result of one generation call. Callers match on the variant; there is no
/// error path out of `TextGenerator::generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Trimmed, non-empty model text.
    Generated(String),
    /// Diagnostic describing why no text was produced.
    Failed(String),
}

impl GenerationOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }

    pub fn text(&self) -> &str {
        match self {
            GenerationOutcome::Generated(text) | GenerationOutcome::Failed(text) => text,
        }
    }
}

/// Per-call generation settings.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    /// Clamped to [0, 1] before sending.
    pub temperature: f32,
    /// Wall-clock bound for this call. `None` uses the client's internal timeout.
    pub timeout: Option<Duration>,
}

/// Seam between the callers (enrichment, harness) and the remote service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// True when calls may reach the remote service.
    fn is_live(&self) -> bool;

    async fn generate(&self, prompt: &str, params: GenerationParams) -> GenerationOutcome;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Production `TextGenerator` backed by the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: GenerationConfig,
}

impl LlmClient {
    pub fn new(config: GenerationConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Makes one raw call to the API and returns the trimmed text.
    async fn call(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        let api_key = self
            .config
            .credential
            .as_deref()
            .ok_or(LlmError::MissingCredential)?;

        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("prompt must not be empty"));
        }
        if params.max_output_tokens == 0 {
            return Err(LlmError::InvalidRequest("max_output_tokens must be positive"));
        }

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: params.max_output_tokens,
                temperature: params.temperature.clamp(0.0, 1.0),
            },
        };

        let url = format!("{}/{}:generateContent", self.config.api_base, self.config.model);
        let mut request = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request_body);
        if let Some(timeout) = params.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        let text = gemini_response.text().ok_or(LlmError::EmptyContent)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn is_live(&self) -> bool {
        self.config.is_live()
    }

    async fn generate(&self, prompt: &str, params: GenerationParams) -> GenerationOutcome {
        match self.call(prompt, params).await {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(LlmError::MissingCredential) => {
                GenerationOutcome::Failed(LlmError::MissingCredential.to_string())
            }
            Err(e) => {
                warn!("LLM call failed: {e}");
                GenerationOutcome::Failed(e.to_string())
            }
        }
    }
}
