use crate::{LocalStorage, Storage, StorageError, StorageResult};
use std::sync::Arc;
use teamspace_core::Config;

/// Create the image storage backend from configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    if config.local_storage_path.trim().is_empty() {
        return Err(StorageError::ConfigError(
            "LOCAL_STORAGE_PATH not configured".to_string(),
        ));
    }
    if config.local_storage_base_url.trim().is_empty() {
        return Err(StorageError::ConfigError(
            "LOCAL_STORAGE_BASE_URL not configured".to_string(),
        ));
    }

    let storage = LocalStorage::new(
        config.local_storage_path.clone(),
        config.local_storage_base_url.clone(),
    )
    .await?;

    tracing::info!(
        path = %config.local_storage_path,
        base_url = %config.local_storage_base_url,
        "Local image storage initialized"
    );

    Ok(Arc::new(storage))
}
