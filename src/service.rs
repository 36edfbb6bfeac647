//! Research service: analysis plus citation enrichment.
//!
//! [`ResearchService`] runs the analysis engine and then the scholar search,
//! merging the citations into the insights. [`ServiceHandle`] is the
//! set-once slot the HTTP layer holds; it is installed once at startup.

use crate::analysis::AnalysisEngine;
use crate::error::{InsightsError, Result};
use crate::llm::LlmClient;
use crate::models::Insights;
use crate::scholar::CitationSearch;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Orchestrates analysis and citation lookup for one request at a time.
pub struct ResearchService {
    engine: AnalysisEngine,
    scholar: Arc<dyn CitationSearch>,
}

impl ResearchService {
    pub fn new(llm: Arc<dyn LlmClient>, scholar: Arc<dyn CitationSearch>) -> Self {
        Self {
            engine: AnalysisEngine::new(llm),
            scholar,
        }
    }

    /// Analyze text and attach scholar citations.
    ///
    /// Analysis errors fail the request. Search errors are logged and leave
    /// `scholar_citations` empty.
    pub async fn analyze_research(&self, text: &str) -> Result<Insights> {
        let analysis = self.engine.analyze(text).await?;
        let mut insights = analysis.insights;

        match self.scholar.search(text).await {
            Ok(records) => insights.scholar_citations = records,
            Err(e) => warn!(error = %e, "Failed to fetch scholar citations"),
        }

        info!(
            attempts = analysis.attempts,
            placeholders = analysis.placeholders.len(),
            citations = insights.scholar_citations.len(),
            "Research analysis complete"
        );

        Ok(insights)
    }
}

/// Set-once holder for the process's [`ResearchService`].
#[derive(Clone, Default)]
pub struct ServiceHandle {
    slot: Arc<OnceLock<Arc<ResearchService>>>,
}

impl ServiceHandle {
    /// Empty handle; requests fail with `ServiceUninitialized` until [`install`](Self::install).
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that is already installed.
    pub fn with_service(service: ResearchService) -> Self {
        let handle = Self::new();
        // A fresh slot is always empty
        let _ = handle.slot.set(Arc::new(service));
        handle
    }

    /// Install the service. Fails if one is already installed.
    pub fn install(&self, service: ResearchService) -> Result<()> {
        self.slot
            .set(Arc::new(service))
            .map_err(|_| InsightsError::Config("research service already initialized".to_string()))
    }

    pub async fn analyze_research(&self, text: &str) -> Result<Insights> {
        let service = self.slot.get().ok_or(InsightsError::ServiceUninitialized)?;
        service.analyze_research(text).await
    }
}
