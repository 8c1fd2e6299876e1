use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use crate::errors::{StoreError, StoreResult};

/// Minimal document-store contract the entity stores are written against.
/// Values are JSON documents; sets hold ids for per-owner indexes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes only if the key is free. Returns false when it is already taken.
    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<bool>;

    /// Returns true if a key was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    async fn set_add(&self, set: &str, member: &str) -> StoreResult<()>;

    async fn set_remove(&self, set: &str, member: &str) -> StoreResult<()>;

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>>;

    async fn ping(&self) -> StoreResult<()>;
}

pub(crate) async fn load_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(data) => serde_json::from_str(&data)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub(crate) async fn save_json<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let data = serde_json::to_string(value)?;
    store.put(key, &data).await
}

/// Builds namespaced keys: every key is prefixed with the configured database name.
#[derive(Debug, Clone)]
pub struct Keys {
    namespace: String,
}

impl Keys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn user(&self, id: &uuid::Uuid) -> String {
        format!("{}:user:{}", self.namespace, id)
    }

    pub fn user_email(&self, email: &str) -> String {
        format!("{}:user_email:{}", self.namespace, email)
    }

    pub fn label(&self, id: &uuid::Uuid) -> String {
        format!("{}:label:{}", self.namespace, id)
    }

    pub fn label_name(&self, owner: &uuid::Uuid, name: &str) -> String {
        format!("{}:label_name:{}:{}", self.namespace, owner, name)
    }

    pub fn user_labels(&self, owner: &uuid::Uuid) -> String {
        format!("{}:user:{}:labels", self.namespace, owner)
    }

    pub fn task(&self, id: &uuid::Uuid) -> String {
        format!("{}:task:{}", self.namespace, id)
    }

    pub fn user_tasks(&self, owner: &uuid::Uuid) -> String {
        format!("{}:user:{}:tasks", self.namespace, owner)
    }
}
