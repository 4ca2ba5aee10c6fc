//! Service Manager Library
//!
//! This crate provides CRUD management of scheduled services over an RPC
//! style HTTP API, backed by PostgreSQL with a best-effort Redis cache.

pub mod cache;
pub mod config;
pub mod infra;
pub mod procedures;
pub mod repository;
pub mod rpc;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use tracing::{info, warn};

use domain::CreateServiceInput;

use crate::cache::{RedisStore, ServiceCache};
use crate::config::ServiceManagerConfig;
use crate::infra::Database;
use crate::procedures::{ServiceManager, ServiceProcedures};
use crate::repository::{ServiceRepository, ServiceStore};
use crate::rpc::{create_router, AppState};

/// Build the HTTP application around a procedure set.
pub fn build_app(procedures: Arc<dyn ServiceProcedures>) -> Router {
    create_router(AppState::new(procedures))
}

/// Run the HTTP server on the given address.
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceManagerConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Insert a demo service when the table is empty (development only).
pub async fn run_seed() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceManagerConfig::from_env();
    let db = Database::connect(&config.database).await?;
    let repo = Arc::new(ServiceStore::new(db.get_connection()));

    if repo.count().await? > 0 {
        info!("Database already seeded");
        return Ok(());
    }

    let cache = connect_cache(&config).await;
    let procedures = ServiceManager::new(repo, cache);

    let demo = procedures
        .create(CreateServiceInput {
            customer_name: Some("Demo Customer".to_string()),
            service_type: Some("Demo Service".to_string()),
            scheduled_at: Some(Utc::now().to_rfc3339()),
            price: Some(100.0),
            status: None,
        })
        .await?;

    info!(id = demo.id, "Seed data inserted");
    Ok(())
}

/// Connect the cache, degrading to a disabled cache when Redis is unreachable.
async fn connect_cache(config: &ServiceManagerConfig) -> ServiceCache {
    match RedisStore::connect(&config.cache.url).await {
        Ok(store) => ServiceCache::new(Arc::new(store), config.cache.default_ttl_seconds),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, serving without cache");
            ServiceCache::disabled()
        }
    }
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: ServiceManagerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database).await?;

    // Create repository, cache and procedures
    let repo = Arc::new(ServiceStore::new(db.get_connection()));
    let cache = connect_cache(&config).await;
    let procedures = Arc::new(ServiceManager::new(repo, cache));

    let app = build_app(procedures);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Service manager listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
