//! In-memory fakes for the store and the cache backend.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use common::{AppError, AppResult};
use domain::{CreateServiceInput, NewService, Service, UpdateServiceInput};
use service_manager_lib::cache::{CacheError, CacheStore, ServiceCache, DEFAULT_CACHE_TTL_SECONDS};
use service_manager_lib::procedures::ServiceManager;
use service_manager_lib::repository::ServiceRepository;

// =============================================================================
// Store fakes
// =============================================================================

/// Store keeping rows in a map, assigning ids from a counter
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<BTreeMap<i32, Service>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    find_calls: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceRepository for InMemoryRepository {
    async fn list(&self) -> AppResult<Vec<Service>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut services: Vec<Service> = self.rows.lock().await.values().cloned().collect();
        services.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(services)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Service>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn create(&self, new: NewService) -> AppResult<Service> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let service = Service::from_new(id, new);
        self.rows.lock().await.insert(id, service.clone());
        Ok(service)
    }

    async fn save(&self, service: Service) -> AppResult<Service> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&service.id) {
            Some(row) => {
                *row = service.clone();
                Ok(service)
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().await.len() as u64)
    }
}

/// Store whose every call fails like a lost connection
pub struct FailingRepository;

fn store_down() -> AppError {
    AppError::internal("connection refused")
}

#[async_trait]
impl ServiceRepository for FailingRepository {
    async fn list(&self) -> AppResult<Vec<Service>> {
        Err(store_down())
    }

    async fn find_by_id(&self, _id: i32) -> AppResult<Option<Service>> {
        Err(store_down())
    }

    async fn create(&self, _new: NewService) -> AppResult<Service> {
        Err(store_down())
    }

    async fn save(&self, _service: Service) -> AppResult<Service> {
        Err(store_down())
    }

    async fn delete(&self, _id: i32) -> AppResult<bool> {
        Err(store_down())
    }

    async fn count(&self) -> AppResult<u64> {
        Err(store_down())
    }
}

// =============================================================================
// Cache fakes
// =============================================================================

/// Cache backend holding raw strings; TTLs are recorded, not enforced
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (String, u64)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn ttl(&self, key: &str) -> Option<u64> {
        self.entries.lock().await.get(key).map(|(_, ttl)| *ttl)
    }

    pub async fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value.to_string(), DEFAULT_CACHE_TTL_SECONDS));
    }
}

/// Glob match supporting `*` wildcards
fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == key,
        Some((head, tail)) => {
            key.starts_with(head)
                && (0..=key.len() - head.len())
                    .filter_map(|skip| key.get(head.len() + skip..))
                    .any(|rest| glob_match(tail, rest))
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().await.get(key).map(|(value, _)| value.clone()))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, ttl_seconds));
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

/// Cache backend that is always down
pub struct FailingStore;

fn cache_down() -> CacheError {
    CacheError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(cache_down())
    }

    async fn set_ex(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), CacheError> {
        Err(cache_down())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        Err(cache_down())
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Err(cache_down())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Procedures over a fresh store and a working in-memory cache
pub struct Harness {
    pub repo: Arc<InMemoryRepository>,
    pub store: Arc<MemoryStore>,
    pub procedures: Arc<ServiceManager>,
}

impl Harness {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let store = Arc::new(MemoryStore::new());
        let cache = ServiceCache::new(store.clone(), DEFAULT_CACHE_TTL_SECONDS);
        let procedures = Arc::new(ServiceManager::new(repo.clone(), cache));
        Self {
            repo,
            store,
            procedures,
        }
    }

    /// Same store, cache backend permanently down
    pub fn with_failing_cache() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = ServiceCache::new(Arc::new(FailingStore), DEFAULT_CACHE_TTL_SECONDS);
        let procedures = Arc::new(ServiceManager::new(repo.clone(), cache));
        Self {
            repo,
            store: Arc::new(MemoryStore::new()),
            procedures,
        }
    }
}

pub fn acme_input() -> CreateServiceInput {
    CreateServiceInput {
        customer_name: Some("Acme".to_string()),
        service_type: Some("Repair".to_string()),
        scheduled_at: Some("2024-01-15T10:00:00Z".to_string()),
        price: Some(150.0),
        status: Some("pending".to_string()),
    }
}

pub fn status_change(status: &str) -> UpdateServiceInput {
    UpdateServiceInput {
        status: Some(status.to_string()),
        ..Default::default()
    }
}
