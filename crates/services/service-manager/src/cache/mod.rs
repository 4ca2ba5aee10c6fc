//! Cache layer: a best-effort side cache in front of the service store.
//!
//! The cache is never authoritative. Every failure degrades to a miss (reads)
//! or a dropped write (writes and invalidations) and is only logged.

mod service_cache;
mod store;

pub use service_cache::{
    service_key, Invalidation, ServiceCache, ALL_SERVICES_KEY, DEFAULT_CACHE_TTL_SECONDS,
    SERVICES_PATTERN, SERVICE_PATTERN,
};
#[cfg(any(test, feature = "test-utils"))]
pub use store::MockCacheStore;
pub use store::{CacheError, CacheStore, RedisStore};
