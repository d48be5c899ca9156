//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgvault-api --test upload_test`.

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use imgvault_api::constants;
use imgvault_api::setup::routes;
use imgvault_api::state::AppState;
use imgvault_core::Config;
use imgvault_storage::{ImageStore, MemoryImageStore};
use std::sync::Arc;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus a handle on the in-memory store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryImageStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app backed by an in-memory store.
pub fn setup_test_app() -> TestApp {
    let store = MemoryImageStore::new();
    let server = setup_server_with_store(Config::default(), Arc::new(store.clone()));
    TestApp { server, store }
}

/// Setup a server around an arbitrary store.
pub fn setup_server_with_store(config: Config, store: Arc<dyn ImageStore>) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), store));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}
