//! Service manager configuration.

use std::env;

use common::{CacheConfig, DatabaseConfig, ServerConfig};

/// Service manager configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceManagerConfig {
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Redis cache settings
    pub cache: CacheConfig,
    /// HTTP bind address
    pub server: ServerConfig,
}

impl ServiceManagerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: env::var("SERVICE_MANAGER_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.database.min_connections),
            },
            cache: CacheConfig {
                url: env::var("SERVICE_MANAGER_REDIS_URL")
                    .or_else(|_| env::var("REDIS_URL"))
                    .unwrap_or(defaults.cache.url),
                default_ttl_seconds: parse_var("CACHE_TTL_SECONDS")
                    .unwrap_or(defaults.cache.default_ttl_seconds),
            },
            server: ServerConfig {
                host: env::var("SERVICE_MANAGER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVICE_MANAGER_PORT")
                    .or_else(|| parse_var("PORT"))
                    .unwrap_or(defaults.server.port),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
