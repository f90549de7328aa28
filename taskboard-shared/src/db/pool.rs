//! Connection pool management
//!
//! Thin wrapper around `PgPoolOptions` that checks connectivity before
//! handing the pool to [`PgStore`](crate::store::PgStore).

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

/// Pool settings
///
/// Timeouts are in seconds so they can be read straight from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Connections kept warm while idle
    pub min_connections: u32,

    /// How long to wait for a free connection
    pub acquire_timeout_seconds: u64,

    /// Idle connections older than this are closed (`None` keeps them)
    pub idle_timeout_seconds: Option<u64>,

    /// Connections are recycled after this long (`None` never recycles)
    pub max_lifetime_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
        }
    }
}

/// Opens a pool and verifies the database answers
///
/// # Errors
///
/// Returns an error if the URL is invalid, the server is unreachable, or the
/// health check query fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if let Some(idle) = config.idle_timeout_seconds {
        options = options.idle_timeout(Duration::from_secs(idle));
    }
    if let Some(lifetime) = config.max_lifetime_seconds {
        options = options.max_lifetime(Duration::from_secs(lifetime));
    }

    let pool = options.connect(&config.url).await?;
    health_check(&pool).await?;

    info!("Database connection pool ready");
    Ok(pool)
}

/// Runs `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if value != 1 {
        warn!(value, "Database health check returned unexpected value");
        return Err(sqlx::Error::Protocol(
            "health check returned unexpected value".into(),
        ));
    }

    debug!("Database health check passed");
    Ok(())
}

/// Snapshot of pool usage, logged at shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub active_connections: usize,
    pub idle_connections: usize,
    pub total_connections: usize,
}

impl PoolStats {
    fn from_counts(size: u32, idle: usize) -> Self {
        let total = size as usize;
        Self {
            active_connections: total.saturating_sub(idle),
            idle_connections: idle,
            total_connections: total,
        }
    }
}

pub fn get_pool_stats(pool: &PgPool) -> PoolStats {
    PoolStats::from_counts(pool.size(), pool.num_idle())
}

/// Closes every connection in the pool
pub async fn close_pool(pool: PgPool) {
    let stats = get_pool_stats(&pool);
    info!(
        active_connections = stats.active_connections,
        idle_connections = stats.idle_connections,
        "Closing database connection pool"
    );
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert!(config.url.is_empty());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_seconds, 30);
        assert_eq!(config.idle_timeout_seconds, Some(600));
    }

    #[test]
    fn test_pool_stats_from_counts() {
        let stats = PoolStats::from_counts(5, 2);
        assert_eq!(stats.active_connections, 3);
        assert_eq!(stats.total_connections, 5);

        // idle can briefly exceed size while connections are being reaped
        let stats = PoolStats::from_counts(1, 3);
        assert_eq!(stats.active_connections, 0);
    }
}
