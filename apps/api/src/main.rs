mod analysis;
mod config;
mod errors;
mod intake;
mod routes;
mod speech;
mod state;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::client::HttpAnalyzer;
use crate::analysis::sessions::SessionRegistry;
use crate::config::Config;
use crate::routes::build_router;
use crate::speech::client::HttpSpeechAnalyzer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = HttpAnalyzer::new(
        config.analysis_api_url.clone(),
        config.analysis_api_key.clone(),
        config.analysis_timeout,
    )?;
    info!(
        "Analysis client initialized (endpoint: {}, timeout: {:?})",
        config.analysis_api_url, config.analysis_timeout
    );

    let speech = HttpSpeechAnalyzer::new(config.speech_api_url.clone(), config.speech_timeout)?;
    info!(
        "Speech client initialized (endpoint: {}, timeout: {:?})",
        config.speech_api_url, config.speech_timeout
    );

    let sessions = SessionRegistry::new(config.session_idle_ttl);
    sessions.spawn_sweeper(config.session_sweep_interval);
    info!(
        "Session sweeper started (idle ttl: {:?}, every {:?})",
        config.session_idle_ttl, config.session_sweep_interval
    );

    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
        speech: Arc::new(speech),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web app's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr} (max upload {} bytes)", config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
