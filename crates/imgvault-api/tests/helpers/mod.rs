//! Shared setup for API integration tests.
//!
//! The router is the production one; only the repository and storage are swapped
//! for in-memory implementations.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use imgvault_api::setup::routes;
use imgvault_api::AppState;
use imgvault_core::{Config, ServiceConfig, StorageProvider};
use imgvault_db::InMemoryImageRepository;
use imgvault_storage::{MockStorage, StorageSet};
use std::collections::HashMap;
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub repo: InMemoryImageRepository,
    pub storage: MockStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = ServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    Config(Box::new(config))
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(&[]), MockStorage::new())
}

pub fn setup_test_app_with(config: Config, storage: MockStorage) -> TestApp {
    let repo = InMemoryImageRepository::new();
    let state = Arc::new(AppState::new(
        &config,
        Arc::new(repo.clone()),
        StorageSet::new(Arc::new(storage.clone())),
    ));

    let app = routes::build_router(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        repo,
        storage,
    }
}

/// App whose active backend is MinIO with an S3 backend registered for routing.
pub fn setup_test_app_with_s3() -> (TestApp, MockStorage) {
    let config = test_config(&[]);
    let repo = InMemoryImageRepository::new();
    let minio = MockStorage::with_provider(StorageProvider::Minio);
    let s3 = MockStorage::with_provider(StorageProvider::S3);
    let state = Arc::new(AppState::new(
        &config,
        Arc::new(repo.clone()),
        StorageSet::new(Arc::new(minio.clone())).with_backend(Arc::new(s3.clone())),
    ));

    let app = routes::build_router(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    (
        TestApp {
            server,
            repo,
            storage: minio,
        },
        s3,
    )
}
