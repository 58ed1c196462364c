//! Notes Backend - REST server entry point

use anyhow::{Context, Result};
use notes_backend::{build_router, config::DEFAULT_LOG_FILTER, AppState, Config};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing();

    info!("Notes backend starting");

    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set; using insecure dev default");
    }

    let state = AppState::from_config(&config).context("Failed to initialize application")?;
    let app = build_router(state);

    if config.test_mode {
        info!("Test mode: application built, not listening");
        return Ok(());
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
