use std::sync::Arc;

use opvang_core::request_queue::RequestQueue;
use opvang_storage::{HostedStorage, LocalStorage, ObjectStorage};

use crate::config::{ServerConfig, StorageBackend, StorageConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: opvang_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Document blob store.
    pub storage: Arc<dyn ObjectStorage>,
    /// Throttle shared by every call to the hosted store.
    pub request_queue: Arc<RequestQueue>,
}

impl AppState {
    /// Assemble state, building the storage backend the config selects.
    pub fn new(pool: opvang_db::DbPool, config: ServerConfig) -> Self {
        let request_queue = Arc::new(RequestQueue::new(
            config.storage.max_concurrent,
            config.storage.request_delay,
        ));
        let storage = build_storage(&config.storage, Arc::clone(&request_queue));
        Self {
            pool,
            config: Arc::new(config),
            storage,
            request_queue,
        }
    }
}

/// Instantiate the configured [`ObjectStorage`] backend.
pub fn build_storage(config: &StorageConfig, queue: Arc<RequestQueue>) -> Arc<dyn ObjectStorage> {
    match (config.backend, &config.api_url, &config.api_key) {
        (StorageBackend::Hosted, Some(url), Some(key)) => {
            Arc::new(HostedStorage::new(url.clone(), key.clone(), queue))
        }
        (StorageBackend::Hosted, _, _) => {
            tracing::warn!("Hosted storage selected without credentials, using local storage");
            Arc::new(LocalStorage::new(&config.root, &config.public_url))
        }
        (StorageBackend::Local, _, _) => {
            Arc::new(LocalStorage::new(&config.root, &config.public_url))
        }
    }
}
