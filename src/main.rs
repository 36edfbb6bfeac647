//! research-insights - LLM research analysis service
//!
//! Sends research text to an LLM for structured insights and enriches the
//! result with scholar citations.
//!
//! ## Usage
//!
//! ### HTTP Server Mode
//! ```bash
//! GEMINI_API_KEY=... SERPAPI_API_KEY=... research-insights serve --port 8080
//! ```
//!
//! ### CLI Mode
//! ```bash
//! research-insights analyze "Neural networks improve citation graph analysis."
//! research-insights analyze --file draft.txt
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use research_insights::{
    config::{AppConfig, ConfigArgs, ServerConfig, DEFAULT_ALLOWED_ORIGIN},
    llm::GeminiClient,
    scholar::ScholarClient,
    server,
    service::{ResearchService, ServiceHandle},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Research Insights - LLM structured analysis with scholar citations
#[derive(Parser)]
#[command(name = "research-insights")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Single origin allowed by CORS
        #[arg(long, env = "ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
        allowed_origin: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Analyze text once and print the insights JSON
    Analyze {
        /// Text to analyze
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            allowed_origin,
            config,
        } => {
            let server_config = ServerConfig {
                host,
                port,
                allowed_origin,
            };
            run_server(&config, server_config).await
        }
        Commands::Analyze { text, file, config } => run_analyze(&config, text, file).await,
    }
}

fn build_service(args: &ConfigArgs) -> Result<ResearchService> {
    let config = AppConfig::from_args(args)?;
    let llm = GeminiClient::new(config.llm)?;
    let scholar = ScholarClient::new(config.scholar)?;
    Ok(ResearchService::new(Arc::new(llm), Arc::new(scholar)))
}

// ============================================================================
// One-shot Analysis
// ============================================================================

async fn run_analyze(args: &ConfigArgs, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let content = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        (None, None) => bail!("Provide TEXT or --file"),
    };

    let service = build_service(args)?;
    let insights = service
        .analyze_research(&content)
        .await
        .context("Analysis failed")?;

    println!("{}", serde_json::to_string_pretty(&insights)?);
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(args: &ConfigArgs, config: ServerConfig) -> Result<()> {
    let handle = ServiceHandle::new();
    handle.install(build_service(args)?)?;

    let app = server::router(handle, &config)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid host:port")?;

    info!(addr = %addr, origin = %config.allowed_origin, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
