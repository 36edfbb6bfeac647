//! Structured research analysis.
//!
//! Sends research text to the LLM, coerces the free-text reply into
//! [`Insights`], and repairs incomplete replies with a single corrective
//! retry. The flow is a small state machine:
//!
//! ```text
//! Generate -> Validate -> Done
//!                      -> Repair -> Finalize -> Done
//! ```
//!
//! `Finalize` never leads back to `Generate` or `Repair`, so a request makes
//! at most two LLM calls. Fields still empty at `Finalize` get their
//! placeholder values.

use crate::error::{InsightsError, Result};
use crate::llm::LlmClient;
use crate::models::{InsightField, Insights};
use crate::prompts::research_analysis::{build_analysis_prompt, build_retry_prompt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Characters of raw LLM output kept in log previews
const LOG_PREVIEW_CHARS: usize = 500;

/// Outcome of a successful analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Fully populated insights (`scholar_citations` left empty)
    pub insights: Insights,
    /// LLM calls made: 1, or 2 when the repair pass ran
    pub attempts: u8,
    /// Fields that hold placeholder values rather than generated content
    pub placeholders: Vec<InsightField>,
}

enum State {
    Generate,
    Validate(Insights),
    Repair(Vec<InsightField>),
    Finalize(Insights),
    Done(Analysis),
}

/// LLM-backed structured analysis engine
#[derive(Clone)]
pub struct AnalysisEngine {
    llm: Arc<dyn LlmClient>,
}

impl AnalysisEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Analyze research text into fully populated insights.
    ///
    /// # Errors
    ///
    /// * [`InsightsError::EmptyInput`] for blank text, before any LLM call
    /// * [`InsightsError::NoResponse`] when the LLM returns no candidates
    /// * [`InsightsError::MalformedResponse`] when no JSON object can be located
    /// * [`InsightsError::Parse`] when the located object fails to decode
    ///
    /// Any of these from the retry call is returned as-is.
    pub async fn analyze(&self, text: &str) -> Result<Analysis> {
        if text.trim().is_empty() {
            return Err(InsightsError::EmptyInput);
        }

        let mut attempts: u8 = 0;
        let mut state = State::Generate;

        loop {
            state = match state {
                State::Generate => {
                    attempts += 1;
                    let insights = self.generate(&build_analysis_prompt(text)).await?;
                    State::Validate(insights)
                }
                State::Validate(insights) => {
                    let missing = insights.missing_fields();
                    if missing.is_empty() {
                        State::Done(Analysis {
                            insights,
                            attempts,
                            placeholders: Vec::new(),
                        })
                    } else {
                        State::Repair(missing)
                    }
                }
                State::Repair(missing) => {
                    warn!(
                        missing = %join_fields(&missing),
                        "Incomplete analysis, retrying with corrective prompt"
                    );
                    attempts += 1;
                    let insights = self.generate(&build_retry_prompt(text)).await?;
                    State::Finalize(insights)
                }
                State::Finalize(mut insights) => {
                    let placeholders = insights.fill_placeholders();
                    if !placeholders.is_empty() {
                        warn!(
                            fields = %join_fields(&placeholders),
                            "Fields still empty after retry, using placeholders"
                        );
                    }
                    State::Done(Analysis {
                        insights,
                        attempts,
                        placeholders,
                    })
                }
                State::Done(analysis) => {
                    info!(attempts = analysis.attempts, "Analysis complete");
                    return Ok(analysis);
                }
            };
        }
    }

    /// One LLM round trip: generate, sanitize, decode.
    async fn generate(&self, prompt: &str) -> Result<Insights> {
        let response = self.llm.generate(prompt).await?;
        let raw = response
            .first_candidate_text()
            .ok_or(InsightsError::NoResponse)?;
        let json = sanitize_response(&raw)?;
        decode_insights(&json)
    }
}

/// Strip formatting artifacts and cut the reply down to its outermost JSON object.
pub fn sanitize_response(raw: &str) -> Result<String> {
    let cleaned = raw
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .replace('`', "");

    let (start, end) = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            warn!(raw = %preview(raw), "Invalid JSON structure in LLM response");
            return Err(InsightsError::MalformedResponse);
        }
    };

    let json = cleaned[start..=end].trim();
    debug!(cleaned = %preview(json), "Cleaned JSON");

    if !json.starts_with('{') || !json.ends_with('}') {
        warn!(cleaned = %preview(json), "Malformed JSON in LLM response");
        return Err(InsightsError::MalformedResponse);
    }

    Ok(json.to_string())
}

/// Decode a sanitized JSON object into [`Insights`].
pub fn decode_insights(json: &str) -> Result<Insights> {
    serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, cleaned = %preview(json), "JSON parsing error");
        InsightsError::Parse(e)
    })
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}

fn join_fields(fields: &[InsightField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}
