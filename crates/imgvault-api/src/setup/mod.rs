//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a router ready to serve.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgvault_core::Config;
use imgvault_db::PgImageRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        provider = %config.storage_provider(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let repository = Arc::new(PgImageRepository::new(pool));
    let state = Arc::new(AppState::new(&config, repository, storage));

    let router = routes::build_router(&config, state.clone());

    Ok((state, router))
}
