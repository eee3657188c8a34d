mod config;
mod errors;
mod llm_client;
mod models;
mod quiz;
mod routes;
mod session;
mod state;
mod study;

use anyhow::Result;
use chrono::Duration;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Study Companion v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.api_key.clone(),
        config.api_url.clone(),
        config.model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    if config.offline_fallback {
        info!("Offline fallback enabled");
    }

    let session_ttl = Duration::minutes(config.session_ttl_minutes);
    info!("Idle sessions expire after {} minutes", config.session_ttl_minutes);

    let state = AppState {
        llm: Arc::new(llm),
        sessions: Arc::new(SessionStore::new(session_ttl)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
