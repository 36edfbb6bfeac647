//! Integration tests for the HTTP API.
//!
//! The router runs against scripted LLM and search collaborators.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use research_insights::config::ServerConfig;
use research_insights::llm::{GeminiClient, LlmClient, LlmConfig, LlmResponse};
use research_insights::scholar::CitationSearch;
use research_insights::server::router;
use research_insights::service::{ResearchService, ServiceHandle};
use research_insights::{InsightsError, Result, ScholarRecord};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const COMPLETE: &str = r#"{
    "summary": "Neural networks help analyze citation graphs.",
    "suggestions": ["Compare against PageRank"],
    "relatedTopics": ["Graph neural networks"],
    "methodology": ["Node classification"],
    "gaps": ["No ablation study"],
    "citations": ["Smith et al. (2020)"],
    "impact": "Faster literature review.",
    "limitations": ["Single corpus"],
    "futureWork": ["Cross-domain evaluation"]
}"#;

struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .map(LlmResponse::from_text)
            .unwrap_or_default())
    }
}

struct StaticSearch(Option<Vec<ScholarRecord>>);

#[async_trait]
impl CitationSearch for StaticSearch {
    async fn search(&self, _query: &str) -> Result<Vec<ScholarRecord>> {
        self.0
            .clone()
            .ok_or_else(|| InsightsError::SearchFetch("search unavailable".into()))
    }
}

fn app(llm: Arc<ScriptedLlm>, search: StaticSearch) -> axum::Router {
    let handle = ServiceHandle::with_service(ResearchService::new(llm, Arc::new(search)));
    router(handle, &ServerConfig::default()).unwrap()
}

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze-research")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

const LLM_FIELDS: [&str; 9] = [
    "summary",
    "suggestions",
    "relatedTopics",
    "methodology",
    "gaps",
    "citations",
    "impact",
    "limitations",
    "futureWork",
];

#[tokio::test]
async fn test_analyze_end_to_end() {
    let llm = ScriptedLlm::new(&[COMPLETE]);
    let search = StaticSearch(Some(vec![ScholarRecord {
        title: "Graph-based citation analysis".into(),
        year: 2021,
        ..Default::default()
    }]));
    let body = r#"{"content": "Neural networks improve citation graph analysis."}"#;
    let (status, json) = send(app(llm.clone(), search), post(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!json["summary"].as_str().unwrap().is_empty());
    assert!(!json["impact"].as_str().unwrap().is_empty());
    for field in LLM_FIELDS {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    let citations = json["scholarCitations"].as_array().unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0]["title"], "Graph-based citation analysis");
    assert_eq!(citations[0]["citationCount"], 0);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_failure_still_returns_insights() {
    let llm = ScriptedLlm::new(&[COMPLETE]);
    let (status, json) = send(app(llm, StaticSearch(None)), post(r#"{"content": "graphs"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scholarCitations"], serde_json::json!([]));
}

#[tokio::test]
async fn test_incomplete_replies_are_backfilled() {
    let llm = ScriptedLlm::new(&[r#"{"summary": "only this"}"#, r#"{"impact": "and this"}"#]);
    let (status, json) = send(
        app(llm.clone(), StaticSearch(Some(Vec::new()))),
        post(r#"{"content": "graphs"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    assert_eq!(json["summary"], "Not available");
    assert_eq!(json["impact"], "and this");
    assert_eq!(json["gaps"], serde_json::json!(["No gaps identified"]));
    for field in LLM_FIELDS {
        let value = &json[field];
        let populated = value.as_str().map(|s| !s.is_empty()).unwrap_or(false)
            || value.as_array().map(|a| !a.is_empty()).unwrap_or(false);
        assert!(populated, "{field} not populated");
    }
}

#[tokio::test]
async fn test_empty_content_is_bad_request() {
    let llm = ScriptedLlm::new(&[COMPLETE]);
    for body in [r#"{"content": ""}"#, r#"{"content": "   "}"#, "{}"] {
        let (status, json) = send(app(llm.clone(), StaticSearch(None)), post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let llm = ScriptedLlm::new(&[COMPLETE]);
    let req = Request::builder()
        .method("POST")
        .uri("/analyze-research")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(llm.clone(), StaticSearch(None)), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = send(app(llm, StaticSearch(None)), post("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_llm_output_is_server_error_without_leaking() {
    let llm = ScriptedLlm::new(&["I'd rather not answer with SECRET-DRAFT-TEXT"]);
    let (status, json) = send(app(llm, StaticSearch(None)), post(r#"{"content": "graphs"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(!message.contains("SECRET-DRAFT-TEXT"));
}

#[tokio::test]
async fn test_type_mismatch_llm_output_is_server_error_without_leaking() {
    let llm = ScriptedLlm::new(&[r#"{"summary":"x","suggestions":"RAW-LLM-DRAFT-TEXT"}"#]);
    let (status, json) = send(app(llm.clone(), StaticSearch(None)), post(r#"{"content": "graphs"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "failed to parse response");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_llm_transport_failure_does_not_expose_api_key() {
    let mut config = LlmConfig::new("SUPER-SECRET-GEMINI-KEY");
    config.base_url = "http://127.0.0.1:1".to_string();
    let llm = GeminiClient::new(config).unwrap();
    let handle = ServiceHandle::with_service(ResearchService::new(
        Arc::new(llm),
        Arc::new(StaticSearch(None)),
    ));
    let app = router(handle, &ServerConfig::default()).unwrap();

    let (status, json) = send(app, post(r#"{"content": "graphs"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(!message.contains("SUPER-SECRET-GEMINI-KEY"));
    assert!(!message.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_uninitialized_service_is_server_error() {
    let app = router(ServiceHandle::new(), &ServerConfig::default()).unwrap();
    let (status, json) = send(app, post(r#"{"content": "graphs"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "research assistant not initialized");
}

#[tokio::test]
async fn test_cors_preflight() {
    let llm = ScriptedLlm::new(&[]);
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/analyze-research")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app(llm, StaticSearch(None)).oneshot(req).await.unwrap();
    let headers = resp.headers();

    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_cors_rejects_other_origins() {
    let llm = ScriptedLlm::new(&[]);
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/analyze-research")
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app(llm, StaticSearch(None)).oneshot(req).await.unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_health() {
    let app = router(ServiceHandle::new(), &ServerConfig::default()).unwrap();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
