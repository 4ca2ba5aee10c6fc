//! Raw key-value access to the cache backend.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use thiserror::Error;
use tracing::debug;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cache backend failure. Never surfaces past [`super::ServiceCache`].
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("cache payload error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string key-value contract the cache layer needs.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Raw value stored under `key`, if any and not expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl_seconds`
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Keys matching a glob pattern (`*` wildcard)
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Delete all given keys in one round-trip
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
}

/// Redis-backed store over a multiplexed connection manager.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(keys.to_vec()).await?;
        Ok(())
    }
}
