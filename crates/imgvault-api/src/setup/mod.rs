//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgvault_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let store = imgvault_storage::create_store(&config)
        .await
        .context("Failed to initialize image store")?;

    let state = Arc::new(AppState::new(config.clone(), store));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
