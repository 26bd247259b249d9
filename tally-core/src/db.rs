//! Shared connection pool handle.
//!
//! The handle is constructed by the process entry point and injected into
//! the handlers; nothing here is global. The underlying pool connects on
//! first use, and concurrent first uses share a single connect attempt. A
//! failed attempt leaves the cell empty so a later request can retry while
//! the process stays alive.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::error::{Result, TallyError};

/// Pool construction settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Lazily connected, process-lifetime pool handle.
#[derive(Debug)]
pub struct Db {
    config: DbConfig,
    pool: OnceCell<PgPool>,
}

impl Db {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// The shared pool, connecting on first use. Callers racing the first
    /// use share one connect attempt.
    pub async fn pool(&self) -> Result<&PgPool> {
        self.pool
            .get_or_try_init(|| async {
                tracing::info!(
                    max_connections = self.config.max_connections,
                    "connecting database pool"
                );
                PgPoolOptions::new()
                    .max_connections(self.config.max_connections)
                    .acquire_timeout(self.config.acquire_timeout)
                    .connect(&self.config.url)
                    .await
            })
            .await
            .map_err(TallyError::Connection)
    }

    /// Close the pool if it was ever opened. Shutdown only.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DbConfig::new("postgres://localhost/tally");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn close_before_first_use_is_a_noop() {
        let db = Db::new(DbConfig::new("postgres://localhost/tally"));
        db.close().await;
    }

    // Integration tests need a real database.

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_first_use_connects_once() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let db = std::sync::Arc::new(Db::new(DbConfig::new(url)));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move {
                    let pool = db.pool().await.expect("pool init failed");
                    let one: i32 = sqlx::query_scalar("SELECT 1")
                        .fetch_one(pool)
                        .await
                        .expect("probe query failed");
                    one
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.expect("task panicked"), 1);
        }
    }

    #[tokio::test]
    async fn failed_connect_surfaces_and_allows_retry() {
        let db = Db::new(DbConfig {
            url: "postgres://nobody@127.0.0.1:1/absent".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(1),
        });

        let err = db.pool().await.expect_err("connect should fail");
        assert!(matches!(err, TallyError::Connection(_)));

        // The cell stays empty; the next call attempts a fresh connect
        // rather than returning a poisoned pool.
        let err = db.pool().await.expect_err("second connect should fail");
        assert!(matches!(err, TallyError::Connection(_)));
    }
}
