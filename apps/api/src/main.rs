mod config;
mod content;
mod errors;
mod llm_client;
mod results;
mod routes;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::generator::GeminiContentGenerator;
use crate::llm_client::LlmClient;
use crate::results::webhook::SheetsWebhookStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::wizard::driver::WizardDriver;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PrepAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Content generation and results persistence
    let content = Arc::new(GeminiContentGenerator::new(llm));
    if config.results_webhook_url.is_none() {
        warn!("RESULTS_WEBHOOK_URL is not set; saving progress will fail");
    }
    let store = Arc::new(SheetsWebhookStore::new(config.results_webhook_url.clone()));

    // Build app state
    let state = AppState {
        driver: WizardDriver::new(content, store),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
