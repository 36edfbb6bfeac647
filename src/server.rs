//! HTTP surface.
//!
//! `POST /analyze-research` takes `{"content": "..."}` and returns the
//! insights JSON. Failures come back as `{"error": "..."}` with 400 for
//! missing input and 500 for everything else.

use crate::config::ServerConfig;
use crate::error::{InsightsError, Result};
use crate::service::ServiceHandle;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub content: String,
}

/// JSON error response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<InsightsError> for ApiError {
    fn from(e: InsightsError) -> Self {
        Self {
            status: e.status_code(),
            message: e.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the application router.
pub fn router(service: ServiceHandle, config: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/analyze-research", post(analyze_handler))
        .layer(cors_layer(&config.allowed_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(service))
}

/// CORS restricted to a single origin, POST/OPTIONS, and a short header list
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .map_err(|e| InsightsError::Config(format!("Invalid allowed origin: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Analyze endpoint handler
async fn analyze_handler(
    State(service): State<ServiceHandle>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| {
        warn!(error = %e, "Rejected analyze request body");
        ApiError::bad_request("Invalid request body")
    })?;

    if req.content.trim().is_empty() {
        return Err(ApiError::bad_request("Content is required"));
    }

    info!(content_len = req.content.len(), "Analyze request");

    match service.analyze_research(&req.content).await {
        Ok(insights) => Ok(Json(insights).into_response()),
        Err(e) => {
            error!(error = %e, "Analysis failed");
            Err(e.into())
        }
    }
}
