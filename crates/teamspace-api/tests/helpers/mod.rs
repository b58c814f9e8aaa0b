//! Test helpers: build AppState and router for integration tests.
//!
//! Every test gets its own in-memory record backend and a local storage
//! directory under a temp dir, so no database is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod workspaces;

use axum_test::TestServer;
use std::sync::Arc;
use teamspace_api::constants;
use teamspace_api::setup::routes;
use teamspace_api::AppState;
use teamspace_core::Config;
use teamspace_db::{Backend, MemoryStore};
use teamspace_storage::{LocalStorage, Storage};
use tempfile::TempDir;

/// Image limit used by the test app; small so the oversize path is cheap to hit.
pub const TEST_MAX_IMAGE_BYTES: usize = 4096;

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, store handle, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Turn a public image URL back into a path under the storage directory.
    pub fn stored_file(&self, image_url: &str) -> std::path::PathBuf {
        let key = image_url
            .strip_prefix(&format!("{}/", self.config.local_storage_base_url))
            .expect("image URL outside the media base URL");
        std::path::Path::new(&self.config.local_storage_path).join(key)
    }

    /// Turn a public image URL into the path served by the app itself.
    pub fn media_path(&self, image_url: &str) -> String {
        let key = image_url
            .strip_prefix(&format!("{}/", self.config.local_storage_base_url))
            .expect("image URL outside the media base URL");
        format!("{}/{}", constants::MEDIA_PREFIX, key)
    }
}

/// Setup test app with an in-memory backend and local storage in a temp dir.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().join("media");

    let mut config = Config::development(storage_path.to_string_lossy().to_string());
    config.max_image_size_bytes = TEST_MAX_IMAGE_BYTES;

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&storage_path, config.local_storage_base_url.clone())
            .await
            .expect("Failed to create local storage"),
    );

    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(
        Backend::from_memory(store.clone()),
        storage,
        config.clone(),
    ));

    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        store,
        config,
        _temp_dir: temp_dir,
    }
}
