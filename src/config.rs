//! Process configuration.
//!
//! Settings come from CLI flags with environment fallbacks. The two API
//! keys are required; a missing or blank key is a startup error.

use crate::error::{InsightsError, Result};
use crate::llm::{LlmConfig, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use crate::scholar::{ScholarConfig, DEFAULT_SCHOLAR_BASE_URL};
use clap::Args;

/// Default CORS origin (the editor frontend's dev server)
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Shared configuration flags
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// LLM API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub llm_key: Option<String>,

    /// LLM API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_LLM_BASE_URL)]
    pub llm_base_url: String,

    /// LLM model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_LLM_MODEL)]
    pub llm_model: String,

    /// Search API key
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    pub scholar_key: Option<String>,

    /// Search API base URL
    #[arg(long, env = "SERPAPI_BASE_URL", default_value = DEFAULT_SCHOLAR_BASE_URL)]
    pub scholar_base_url: String,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

/// Validated collaborator configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub scholar: ScholarConfig,
}

impl AppConfig {
    /// Validate flags into a usable configuration.
    pub fn from_args(args: &ConfigArgs) -> Result<Self> {
        let llm_key = required(args.llm_key.as_deref(), "GEMINI_API_KEY")?;
        let scholar_key = required(args.scholar_key.as_deref(), "SERPAPI_API_KEY")?;

        let mut llm = LlmConfig::new(llm_key);
        llm.base_url = args.llm_base_url.clone();
        llm.model = args.llm_model.clone();

        let mut scholar = ScholarConfig::new(scholar_key);
        scholar.base_url = args.scholar_base_url.clone();

        Ok(Self { llm, scholar })
    }
}

fn required(value: Option<&str>, name: &str) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| InsightsError::Config(format!("{} environment variable is required", name)))
}
