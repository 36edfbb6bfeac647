//! # research-insights
//!
//! Research Insights - LLM structured analysis with scholarly citation enrichment
//!
//! ## Modules
//!
//! - [`analysis`] - LLM analysis with sanitize/validate/repair
//! - [`scholar`] - Scholar search API client
//! - [`fields`] - Total accessors for loosely-typed JSON
//! - [`service`] - Analysis + citation orchestration
//! - [`server`] - HTTP router
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use research_insights::{llm::{GeminiClient, LlmConfig}, scholar::{ScholarClient, ScholarConfig}};
//! use research_insights::service::ResearchService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = GeminiClient::new(LlmConfig::new("gemini-key"))?;
//!     let scholar = ScholarClient::new(ScholarConfig::new("serpapi-key"))?;
//!     let service = ResearchService::new(Arc::new(llm), Arc::new(scholar));
//!     let insights = service.analyze_research("Neural networks improve citation graph analysis.").await?;
//!     println!("{}", insights.summary);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod fields;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod scholar;
pub mod server;
pub mod service;

pub use error::{InsightsError, Result};
pub use models::{InsightField, Insights, ScholarRecord};
