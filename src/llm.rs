//! LLM text-generation client.
//!
//! [`LlmClient`] is the seam the analysis engine talks to; [`GeminiClient`]
//! implements it against the Gemini `generateContent` REST endpoint.

use crate::error::{InsightsError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name
pub const DEFAULT_LLM_MODEL: &str = "gemini-pro";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.3,
            max_output_tokens: 2048,
        }
    }
}

/// One generated candidate, reduced to its text parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<String>,
}

/// Generation result: zero or more candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub candidates: Vec<Candidate>,
}

impl LlmResponse {
    /// Response with a single candidate holding one text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![text.into()],
            }],
        }
    }

    /// Concatenated text parts of the first candidate.
    pub fn first_candidate_text(&self) -> Option<String> {
        self.candidates.first().map(|c| c.parts.concat())
    }
}

/// Prompt in, candidates out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;
}

/// Gemini REST response structures
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    content: Option<ApiContent>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    text: Option<String>,
}

impl From<GenerateContentResponse> for LlmResponse {
    fn from(r: GenerateContentResponse) -> Self {
        let candidates = r
            .candidates
            .into_iter()
            .map(|c| Candidate {
                // Non-text parts (function calls, inline data) are dropped
                parts: c
                    .content
                    .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
                    .unwrap_or_default(),
            })
            .collect();
        Self { candidates }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| InsightsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let request_body = serde_json::json!({
            "contents": [
                {"parts": [{"text": prompt}]}
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens
            }
        });

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending LLM request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InsightsError::Network(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), error = %error_text, "LLM API error");
            return Err(InsightsError::Api {
                code: status.as_u16(),
                message: format!("LLM API error: {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InsightsError::Network(e.without_url()))?;
        let api_response: GenerateContentResponse = serde_json::from_str(&body)?;

        debug!(
            candidates = api_response.candidates.len(),
            "LLM response received"
        );

        Ok(api_response.into())
    }
}
