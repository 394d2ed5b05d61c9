mod handlers;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use team_engine::EngineConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use state::AppState;

// ─── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "team_backend=info,team_engine=info,tower_http=warn".into()),
        )
        .init();

    info!("🏁 Team Draw backend starting...");

    // Default roster shown by the UI on first load
    let config_path = std::env::var("TEAM_CONFIG").ok().map(PathBuf::from);
    let config = EngineConfig::load_or_bundled(config_path.as_deref())
        .context("loading roster config")?;
    info!(
        "Default roster: {} teams, {} participants, {} constraints",
        config.roster.team_count,
        config.roster.participants.len(),
        config.roster.constraints.len()
    );

    // CORS: the UI is served from a different origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(AppState::new(config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    info!("🚀 Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
