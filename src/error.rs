//! Custom error types for research-insights.
//!
//! This module defines all error types used throughout the service.
//! All functions return `Result<T, InsightsError>` instead of using `unwrap()`.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for research-insights operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Analysis was requested for empty (or whitespace-only) text
    #[error("empty content provided")]
    EmptyInput,

    /// The LLM returned zero candidates
    #[error("no response generated")]
    NoResponse,

    /// No JSON object boundaries could be located in the LLM output
    #[error("invalid JSON structure in response")]
    MalformedResponse,

    /// The located JSON object failed to decode. The serde message can quote
    /// model output, so it stays in the source chain only.
    #[error("failed to parse response")]
    Parse(#[from] serde_json::Error),

    /// An analysis was requested before the service was installed
    #[error("research assistant not initialized")]
    ServiceUninitialized,

    /// Scholar search failed (logged and swallowed by the service)
    #[error("failed to fetch scholar results: {0}")]
    SearchFetch(String),

    /// Network/HTTP request error. Build with `without_url()`: request URLs carry API keys.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status from API
        code: u16,
        /// Error message from API
        message: String,
    },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl InsightsError {
    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            InsightsError::EmptyInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to an HTTP caller.
    ///
    /// Transport, upstream and configuration details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            InsightsError::Network(_) | InsightsError::Api { .. } | InsightsError::Config(_) => {
                "internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias using `InsightsError`
pub type Result<T> = std::result::Result<T, InsightsError>;
