//! Slipway - outfitting progress tracking backend
//!
//! Headless entry point: loads configuration, assembles the application
//! context, and runs until interrupted.

use std::path::Path;
use std::sync::Arc;

use slipway_app::AppContext;
use slipway_infra::load_config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => info!(error = %err, "no .env file loaded"),
    }

    let config = load_config(Some(Path::new("slipway.toml")))?;
    let context = Arc::new(AppContext::new_with_config(config).await?);

    let health = context.health_check().await;
    if health.healthy {
        info!(online = health.online, "slipway started");
    } else {
        warn!(?health, "slipway started degraded");
    }

    tokio::signal::ctrl_c().await?;
    info!("interrupt received");

    context.shutdown().await?;
    Ok(())
}
