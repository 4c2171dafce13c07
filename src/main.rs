use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use kb_search::api;
use kb_search::config::Config;
use kb_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let sources = config.data_sources();
    tracing::info!("Environment: {:?} (host {})", sources.environment, config.host);
    tracing::info!("Primary source: {}", sources.primary);
    if let Some(fallback) = &sources.fallback {
        tracing::info!("Fallback source: {fallback}");
    }

    let state = AppState::new(config.clone())?;

    // Serve whatever loaded; an empty listing can be retried via /api/reload.
    if let Err(e) = state.load().await {
        tracing::error!("Initial load failed: {e:#}");
    }

    let app = Router::new()
        .route("/api/results", get(api::results::results))
        .route("/api/work-areas", get(api::results::work_areas))
        .route("/api/status", get(api::results::status))
        .route("/api/reload", post(api::results::reload))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
