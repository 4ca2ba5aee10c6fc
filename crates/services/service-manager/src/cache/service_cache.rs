//! Typed, best-effort cache for service records.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::store::{CacheError, CacheStore};

/// Default cache TTL in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Key holding the full service list
pub const ALL_SERVICES_KEY: &str = "services:all";

/// Pattern covering every list-level key
pub const SERVICES_PATTERN: &str = "services:*";

/// Pattern covering every per-service key
pub const SERVICE_PATTERN: &str = "service:*";

/// Cache key prefix for a single service
const CACHE_PREFIX_SERVICE: &str = "service:";

/// Key holding a single service
pub fn service_key(id: i32) -> String {
    format!("{}{}", CACHE_PREFIX_SERVICE, id)
}

/// What a write invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// List keys plus every per-service key (used on create)
    AllServices,
    /// List keys plus the key of one service (used on update and delete)
    Service(i32),
}

/// Cache-aside helper over a [`CacheStore`].
///
/// None of the operations fail: backend and codec errors are logged at
/// `warn` and reported as a miss or silently dropped.
#[derive(Clone)]
pub struct ServiceCache {
    store: Option<Arc<dyn CacheStore>>,
    ttl_seconds: u64,
}

impl ServiceCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl_seconds: u64) -> Self {
        Self {
            store: Some(store),
            ttl_seconds,
        }
    }

    /// A cache that always misses. Used when the backend is unreachable at startup.
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Read and decode a cached value. Any failure is a miss.
    pub async fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;

        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read from cache");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, error = %CacheError::from(e), "Failed to decode cached value");
                None
            }
        }
    }

    /// Encode and store a value with the configured TTL. Failures are dropped.
    pub async fn set_cached<T: Serialize>(&self, key: &str, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let result = match serde_json::to_string(value) {
            Ok(json) => store.set_ex(key, json, self.ttl_seconds).await,
            Err(e) => Err(CacheError::from(e)),
        };

        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to write to cache");
        }
    }

    /// Remove the keys a write made stale. Failures are logged and swallowed.
    pub async fn invalidate(&self, scope: Invalidation) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        match invalidate_keys(store.as_ref(), scope).await {
            Ok(count) => debug!(?scope, count, "Cache invalidated"),
            Err(e) => warn!(?scope, error = %e, "Failed to invalidate cache"),
        }
    }
}

/// Enumerate every stale key first, then delete them in a single batch.
async fn invalidate_keys(store: &dyn CacheStore, scope: Invalidation) -> Result<usize, CacheError> {
    let mut keys = store.keys(SERVICES_PATTERN).await?;

    match scope {
        Invalidation::AllServices => keys.extend(store.keys(SERVICE_PATTERN).await?),
        Invalidation::Service(id) => keys.push(service_key(id)),
    }

    keys.sort();
    keys.dedup();

    if keys.is_empty() {
        return Ok(0);
    }

    store.delete(&keys).await?;
    Ok(keys.len())
}
