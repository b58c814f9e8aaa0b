//! Image storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use teamspace_core::Config;
use teamspace_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    create_storage(config)
        .await
        .context("Failed to initialize image storage")
}
