use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use crate::errors::StoreResult;
use super::store::DocumentStore;

/// Redis-backed document store. One multiplexed connection, cloned per call.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(key).await?;
        Ok(data)
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let written: bool = conn.set_nx(key, value).await?;
        Ok(written)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn set_add(&self, set: &str, member: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(set, member).await?;
        Ok(())
    }

    async fn set_remove(&self, set: &str, member: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(set, member).await?;
        Ok(())
    }

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(set).await?;
        Ok(members)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}
