//! Storage setup and initialization

use anyhow::{Context, Result};
use imgvault_core::Config;
use imgvault_storage::{create_storage_set, StorageSet};

/// Build the configured storage backends, creating the MinIO bucket if needed.
pub async fn setup_storage(config: &Config) -> Result<StorageSet> {
    tracing::info!(
        provider = %config.storage_provider(),
        "Initializing storage..."
    );
    let storage = create_storage_set(config)
        .await
        .context("Failed to initialize storage")?;
    Ok(storage)
}
