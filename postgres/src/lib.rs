//! `PostgreSQL` persistence for the ticket pool.
//!
//! [`PostgresStore`] implements every storage seam the pool manager needs:
//!
//! - [`IdentityLookup`](ticket_pool_core::IdentityLookup) and
//!   [`ActorRegistry`](ticket_pool_core::ActorRegistry) over `vendors` / `customers`
//! - [`ConfigStore`](ticket_pool_core::ConfigStore) over the singleton `ticket_config` row
//! - [`PoolRepository`](ticket_pool_core::PoolRepository) over the singleton `ticket_pool` row
//! - [`PoolLedger`](ticket_pool_core::PoolLedger) writing `ticket_pool` and the append-only `ticket_log` in one transaction
//!
//! # Example
//!
//! ```no_run
//! use ticket_pool_postgres::{DatabaseConfig, PostgresStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresStore::connect(&DatabaseConfig::new("postgres://localhost/tickets")).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod ledger;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use ticket_pool_core::StorageError;

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// How long to wait for a connection
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Settings for `url` with default pool sizing.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// PostgreSQL-backed store for config, pool state, log and actors.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the database cannot be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| StorageError::Unavailable(format!("Failed to connect: {e}")))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Database(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Round-trip a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the database does not answer.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a query failure, counting it by operation.
fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| {
        tracing::error!(operation, error = %e, "Database query failed");
        metrics::counter!("ticket_pool.postgres.errors_total", "operation" => operation)
            .increment(1);
        StorageError::Database(format!("{operation}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::new("postgres://localhost/tickets");
        assert_eq!(config.url, "postgres://localhost/tickets");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_db_error_keeps_operation() {
        let err = db_error("load_pool")(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::Database(msg) if msg.starts_with("load_pool:")));
    }
}
