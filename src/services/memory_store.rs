use std::collections::{HashMap, HashSet};
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::errors::StoreResult;
use super::store::DocumentStore;

/// In-process document store with the same semantics as the Redis backend.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    sets: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut values = self.values.write().await;
        if values.contains_key(key) {
            return Ok(false);
        }
        values.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let removed_value = self.values.write().await.remove(key).is_some();
        let removed_set = self.sets.write().await.remove(key).is_some();
        Ok(removed_value || removed_set)
    }

    async fn set_add(&self, set: &str, member: &str) -> StoreResult<()> {
        self.sets
            .write()
            .await
            .entry(set.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_remove(&self, set: &str, member: &str) -> StoreResult<()> {
        let mut sets = self.sets.write().await;
        if let Some(members) = sets.get_mut(set) {
            members.remove(member);
            // Redis drops empty sets
            if members.is_empty() {
                sets.remove(set);
            }
        }
        Ok(())
    }

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .sets
            .read()
            .await
            .get(set)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
