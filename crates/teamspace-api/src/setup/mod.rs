//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use teamspace_core::Config;

const SERVICE_NAME: &str = "teamspace-api";

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    teamspace_infra::init_telemetry(config.log_format, SERVICE_NAME, &config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let backend = database::setup_backend(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(backend, storage, config.clone()));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
