//! Scholar search client.
//!
//! Queries a SerpApi-style Google Scholar endpoint and maps its generic JSON
//! result into [`ScholarRecord`]s. The response is treated as an untyped
//! tree and read through the total accessors in [`crate::fields`].

use crate::error::{InsightsError, Result};
use crate::fields::{find_year, int_or_default, nested, parse_leading_int, string_or_default, value_to_int};
use crate::models::ScholarRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default search API base URL
pub const DEFAULT_SCHOLAR_BASE_URL: &str = "https://serpapi.com";

/// Number of results requested per query
pub const DEFAULT_NUM_RESULTS: u32 = 5;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Scholar search configuration
#[derive(Debug, Clone)]
pub struct ScholarConfig {
    pub base_url: String,
    pub api_key: String,
    pub num_results: u32,
}

impl ScholarConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_SCHOLAR_BASE_URL.to_string(),
            api_key: api_key.into(),
            num_results: DEFAULT_NUM_RESULTS,
        }
    }
}

/// Citation lookup for a free-text query.
#[async_trait]
pub trait CitationSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ScholarRecord>>;
}

/// Search API client
pub struct ScholarClient {
    client: reqwest::Client,
    config: ScholarConfig,
}

impl ScholarClient {
    pub fn new(config: ScholarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| InsightsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the search URL with the fixed engine/language/count parameters
    fn build_search_url(&self, query: &str) -> Result<Url> {
        let base = format!("{}/search.json", self.config.base_url.trim_end_matches('/'));
        let num = self.config.num_results.to_string();
        Url::parse_with_params(
            &base,
            &[
                ("engine", "google_scholar"),
                ("q", query),
                ("hl", "en"),
                ("num", num.as_str()),
                ("api_key", self.config.api_key.as_str()),
            ],
        )
        .map_err(|e| InsightsError::Config(format!("Invalid scholar base URL: {}", e)))
    }
}

#[async_trait]
impl CitationSearch for ScholarClient {
    async fn search(&self, query: &str) -> Result<Vec<ScholarRecord>> {
        let url = self.build_search_url(query)?;

        debug!(query_len = query.len(), "Sending scholar search request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InsightsError::SearchFetch(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InsightsError::SearchFetch(format!(
                "search API error: {} - {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| {
                InsightsError::SearchFetch(format!("invalid search response: {}", e.without_url()))
            })?;

        // SerpApi reports failures in-band
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(InsightsError::SearchFetch(message.to_string()));
        }

        let records = parse_organic_results(&body);
        info!(found = records.len(), "Scholar search complete");
        Ok(records)
    }
}

/// Map the `organic_results` list of a search response into records.
///
/// A missing or non-list `organic_results` yields an empty list. Entries
/// without a title are dropped.
pub fn parse_organic_results(body: &Value) -> Vec<ScholarRecord> {
    let Some(results) = body.get("organic_results").and_then(Value::as_array) else {
        warn!("No scholar results found for query");
        return Vec::new();
    };

    results
        .iter()
        .filter(|r| r.is_object())
        .map(parse_record)
        .filter(|r| !r.title.is_empty())
        .collect()
}

fn parse_record(result: &Value) -> ScholarRecord {
    let summary = nested(result, &["publication_info", "summary"])
        .and_then(Value::as_str)
        .unwrap_or_default();

    ScholarRecord {
        title: string_or_default(result, "title"),
        authors: extract_authors(result),
        year: extract_year(result, summary),
        journal: summary.to_string(),
        volume: String::new(),
        pages: String::new(),
        publisher: summary.to_string(),
        doi: string_or_default(result, "doi"),
        url: string_or_default(result, "link"),
        citation_count: extract_citation_count(result),
    }
}

/// Author names from `authors`, falling back to `publication_info.authors`.
/// Entries without a string `name` are skipped.
fn extract_authors(result: &Value) -> Vec<String> {
    let list = result
        .get("authors")
        .and_then(Value::as_array)
        .or_else(|| nested(result, &["publication_info", "authors"]).and_then(Value::as_array));

    list.map(|authors| {
        authors
            .iter()
            .filter_map(|a| a.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Year from the `year` string, falling back to the publication summary.
fn extract_year(result: &Value, summary: &str) -> i64 {
    match result.get("year") {
        Some(Value::String(s)) => parse_leading_int(s),
        Some(Value::Number(_)) => int_or_default(result, "year"),
        _ => find_year(summary).unwrap_or(0),
    }
}

fn extract_citation_count(result: &Value) -> i64 {
    if result.get("cited_by_count").is_some() {
        return int_or_default(result, "cited_by_count");
    }
    nested(result, &["inline_links", "cited_by", "total"])
        .map(value_to_int)
        .unwrap_or(0)
}
