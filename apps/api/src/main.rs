mod chat;
mod config;
mod errors;
mod knowledge;
mod llm_client;
mod loan;
mod markdown;
mod routes;
mod state;
mod tarot;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tarot::TarotDeck;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed numeric env values fail here
    let config = Config::load()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Knowledge tables (never fatal)
    let knowledge = KnowledgeBase::load_from_dir(&config.knowledge_dir);

    // Tarot deck (tarot endpoint answers 503 without it)
    let tarot = match TarotDeck::load(&config.tarot_cards_file) {
        Ok(deck) => Some(deck),
        Err(e) => {
            warn!("Tarot deck unavailable: {e}");
            None
        }
    };

    // Generation client, or demo mode
    if config.demo_mode() {
        warn!("No Gemini API key configured; running in demo mode");
    }
    let generator = build_generator(&config)?;

    let state = AppState::new(config.clone(), knowledge, generator, tarot);

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

fn build_generator(config: &Config) -> Result<Option<Arc<dyn TextGenerator>>> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        return Ok(None);
    };

    let client = LlmClient::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        api_key,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", client.model());

    Ok(Some(Arc::new(client)))
}
