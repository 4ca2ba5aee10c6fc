//! Service procedures - cache-aside reads and invalidating writes.
//!
//! Every procedure validates its input before touching the store. Reads try
//! the cache first and populate it on a miss; writes invalidate after the
//! store accepted them. Cache trouble never changes an outcome.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use common::{AppError, AppResult, OptionExt};
use domain::{
    validate_create, validate_id, validate_update, CreateServiceInput, DeleteServiceResponse,
    FieldErrors, Service, UpdateServiceInput,
};

use crate::cache::{service_key, Invalidation, ServiceCache, ALL_SERVICES_KEY};
use crate::repository::ServiceRepository;

/// Service procedures trait for dependency injection.
#[async_trait]
pub trait ServiceProcedures: Send + Sync {
    /// Validate and persist a new service
    async fn create(&self, input: CreateServiceInput) -> AppResult<Service>;

    /// All services, latest schedule first
    async fn list(&self) -> AppResult<Vec<Service>>;

    /// Single service by ID
    async fn get_by_id(&self, id: i64) -> AppResult<Service>;

    /// Merge the supplied fields over an existing service
    async fn update(&self, id: i64, input: UpdateServiceInput) -> AppResult<Service>;

    /// Hard delete a service
    async fn delete(&self, id: i64) -> AppResult<DeleteServiceResponse>;
}

/// Concrete implementation of ServiceProcedures over a store and a cache.
pub struct ServiceManager {
    repo: Arc<dyn ServiceRepository>,
    cache: ServiceCache,
}

impl ServiceManager {
    /// Create the procedure set from its store and cache handles
    pub fn new(repo: Arc<dyn ServiceRepository>, cache: ServiceCache) -> Self {
        Self { repo, cache }
    }

    async fn find_existing(&self, id: i32, failure: &'static str) -> AppResult<Service> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::wrap(failure, e))?
            .ok_or_not_found()
    }
}

#[async_trait]
impl ServiceProcedures for ServiceManager {
    async fn create(&self, input: CreateServiceInput) -> AppResult<Service> {
        let new = validate_create(&input)?;

        let service = self
            .repo
            .create(new)
            .await
            .map_err(|e| AppError::wrap("Failed to create service", e))?;

        // New ids are unpredictable; clear every per-service key too
        self.cache.invalidate(Invalidation::AllServices).await;

        info!(id = service.id, "Service created");
        Ok(service)
    }

    async fn list(&self) -> AppResult<Vec<Service>> {
        if let Some(services) = self.cache.get_cached::<Vec<Service>>(ALL_SERVICES_KEY).await {
            return Ok(services);
        }

        let services = self
            .repo
            .list()
            .await
            .map_err(|e| AppError::wrap("Failed to fetch services", e))?;

        self.cache.set_cached(ALL_SERVICES_KEY, &services).await;

        Ok(services)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Service> {
        let id = validate_id(id)?;
        let key = service_key(id);

        if let Some(service) = self.cache.get_cached::<Service>(&key).await {
            return Ok(service);
        }

        // Not-found is returned before caching, so misses are never cached
        let service = self.find_existing(id, "Failed to fetch service").await?;

        self.cache.set_cached(&key, &service).await;

        Ok(service)
    }

    async fn update(&self, id: i64, input: UpdateServiceInput) -> AppResult<Service> {
        let (id, changes) = match (validate_id(id), validate_update(&input)) {
            (Ok(id), Ok(changes)) => (id, changes),
            (id, changes) => {
                let mut errors = FieldErrors::new();
                if let Err(e) = id {
                    errors.extend(e);
                }
                if let Err(e) = changes {
                    errors.extend(e);
                }
                return Err(AppError::validation(errors));
            }
        };

        let existing = self.find_existing(id, "Failed to update service").await?;

        let service = self
            .repo
            .save(existing.merged(changes))
            .await
            .map_err(|e| AppError::wrap("Failed to update service", e))?;

        self.cache.invalidate(Invalidation::Service(id)).await;

        info!(id, "Service updated");
        Ok(service)
    }

    async fn delete(&self, id: i64) -> AppResult<DeleteServiceResponse> {
        let id = validate_id(id)?;

        self.find_existing(id, "Failed to delete service").await?;

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| AppError::wrap("Failed to delete service", e))?;

        // Removed concurrently between lookup and delete
        if !deleted {
            return Err(AppError::NotFound);
        }

        self.cache.invalidate(Invalidation::Service(id)).await;

        info!(id, "Service deleted");
        Ok(DeleteServiceResponse::deleted())
    }
}
