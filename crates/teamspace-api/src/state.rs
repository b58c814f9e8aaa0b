//! Application state shared by every handler.

use std::sync::Arc;

use teamspace_core::Config;
use teamspace_db::Backend;
use teamspace_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub storage: Arc<dyn Storage>,
    pub config: Config,
}

impl AppState {
    pub fn new(backend: Backend, storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            backend,
            storage,
            config,
        }
    }
}
