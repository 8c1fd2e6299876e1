use std::sync::Arc;
use crate::{
    config::{Config, StorageBackend},
    errors::AppResult,
    services::{Credentials, DocumentStore, Keys, LabelStore, MemoryStore, RedisStore, TaskStore, UserStore},
};

/// Shared by every handler. Immutable after startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub credentials: Credentials,
    pub users: UserStore,
    pub labels: LabelStore,
    pub tasks: TaskStore,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let credentials = Credentials::from_config(&config.auth)?;
        let keys = Keys::new(config.storage.database.clone());

        Ok(Self {
            users: UserStore::new(store.clone(), keys.clone(), credentials.clone()),
            labels: LabelStore::new(store.clone(), keys.clone()),
            tasks: TaskStore::new(store.clone(), keys),
            credentials,
            store,
            config: Arc::new(config),
        })
    }

    /// Opens the configured storage backend and wires the stores to it.
    pub async fn connect(config: Config) -> AppResult<Self> {
        let store: Arc<dyn DocumentStore> = match config.storage.backend {
            StorageBackend::Redis => Arc::new(RedisStore::connect(&config.storage.url).await?),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(config, store)
    }
}
