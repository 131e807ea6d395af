//! Record store for employee rows.
//!
//! [`Store`] owns the SQLite connection pool and the schema migrations. It is
//! created once at process start with [`Store::init`], handed to the data
//! service, and closed with [`Store::teardown`] at shutdown. The SQL itself
//! lives in [`employees`], one function per statement.

pub mod employees;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::DirectoryResult;

/// Handle to the employee record store.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the pool described by `config` and applies migrations.
    ///
    /// File-backed databases are created if missing.
    pub async fn init(config: &DatabaseConfig) -> DirectoryResult<Self> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connecting to record store"
        );

        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Opens a private in-memory database with migrations applied.
    ///
    /// The pool is pinned to a single connection that is never recycled,
    /// since every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> DirectoryResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn migrate(&self) -> DirectoryResult<()> {
        info!("Running record store migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a transaction for a single mutating operation.
    pub async fn begin(&self) -> DirectoryResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Closes every pooled connection. Waits for checked-out connections to
    /// be returned.
    pub async fn teardown(self) {
        info!("Closing record store");
        self.pool.close().await;
    }
}
