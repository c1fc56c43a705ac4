//! search-summary: web search with AI-generated summaries
//!
//! This is the main entry point for the application.

use anyhow::Result;
use search_summary::{
    config::{self, Settings},
    network::HttpClient,
    providers::{CompletionOptions, ExaSearch, OpenAiChat},
    search::SummarySearch,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so `debug` can raise the level
    let settings = config::load()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting search-summary v{}", search_summary::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let orchestrator = build_orchestrator(&settings, client)?;

    // Create application state
    let state = AppState::new(settings.clone(), orchestrator)?;
    info!("Application state initialized");

    let app = create_router(state);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the provider adapters into the orchestrator
fn build_orchestrator(settings: &Settings, client: HttpClient) -> Result<SummarySearch> {
    // Missing keys surface as failed provider calls, not a startup error
    if settings.exa.api_key.is_none() {
        warn!("EXA_API_KEY is not set; searches will fail");
    }
    if settings.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; summaries will be unavailable");
    }

    let search = ExaSearch::new(client.clone(), &settings.exa)?;
    let completion = OpenAiChat::new(client, &settings.openai)?;

    let completion_options = CompletionOptions::new()
        .with_model(settings.summary.model.clone())
        .with_temperature(settings.summary.temperature);

    Ok(SummarySearch::new(Arc::new(search), Arc::new(completion))
        .with_result_limit(settings.summary.result_limit)
        .with_completion_options(completion_options))
}
