//! Service repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
};

use super::entities::service::{self, insert_model, update_model, Entity as ServiceEntity};
use common::{AppError, AppResult};
use domain::{NewService, Service};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service repository trait for dependency injection.
///
/// The repository is the system of record; it knows nothing about caching.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// List every service, latest schedule first
    async fn list(&self) -> AppResult<Vec<Service>>;

    /// Find service by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Service>>;

    /// Insert a new service; the store assigns the id
    async fn create(&self, new: NewService) -> AppResult<Service>;

    /// Overwrite every column of an existing service.
    /// Fails with `NotFound` when the row is gone.
    async fn save(&self, service: Service) -> AppResult<Service>;

    /// Hard delete by ID. Returns false when no row matched.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Number of stored services
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of ServiceRepository backed by SeaORM
pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: service::Model) -> AppResult<Service> {
    Service::try_from(model).map_err(AppError::from)
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn list(&self) -> AppResult<Vec<Service>> {
        let models = ServiceEntity::find()
            .order_by_desc(service::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Service>> {
        let result = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn create(&self, new: NewService) -> AppResult<Service> {
        let active_model = insert_model(&new)?;

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        to_domain(model)
    }

    async fn save(&self, service: Service) -> AppResult<Service> {
        let active_model = update_model(&service)?;

        match active_model.update(&self.db).await {
            Ok(model) => to_domain(model),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = ServiceEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        ServiceEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
