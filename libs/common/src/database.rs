//! Database module for handling SQLite connections and schema migrations
//!
//! This module provides connection pooling, configuration, migrations,
//! health checks and shutdown for the relational store.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: "sqlite://pinboard.db")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Acquire timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pinboard.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            max_connections,
            connection_timeout,
        })
    }

    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 30,
        }
    }

    /// Whether the URL points at an in-memory database
    ///
    /// Every connection to an in-memory database sees its own empty
    /// database, so such pools are pinned to a single long-lived connection.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Initialize a SQLite connection pool
///
/// Foreign keys are enforced on every connection and the database file is
/// created when missing.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<SqlitePool>` - SQLite connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    info!("Initializing database connection pool");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool_options =
        SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.connection_timeout));

    let pool_options = if config.is_in_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> DatabaseResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Database migrations applied");
    Ok(())
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - SQLite connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the database answered, false otherwise
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => Ok(true),
        Err(e) => {
            error!("Database health check failed: {}", e);
            Ok(false)
        }
    }
}

/// Close the pool, waiting for checked-out connections to be returned
///
/// Safe to call more than once, including from shutdown paths that race.
pub async fn close(pool: &SqlitePool) {
    if pool.is_closed() {
        return;
    }

    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_database_config_from_env() {
        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        }

        let config = DatabaseConfig::from_env().expect("Failed to create database config");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connection_timeout, 30);
        assert_eq!(config.database_url, "sqlite://pinboard.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    #[serial]
    fn test_database_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite::memory:");
            std::env::set_var("DATABASE_MAX_CONNECTIONS", "20");
        }

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 20);
        assert!(config.is_in_memory());

        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        }
    }

    #[tokio::test]
    async fn test_in_memory_pool_migrates_and_closes_twice() {
        let pool = init_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert!(health_check(&pool).await.unwrap());

        close(&pool).await;
        close(&pool).await;
        assert!(pool.is_closed());
    }
}
