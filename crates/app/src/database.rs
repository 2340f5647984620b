//! Database connection management

use std::{future::Future, io, time::Duration};

use sqlx::{
    PgPool, Postgres, Transaction,
    pool::PoolConnection,
    postgres::PgPoolOptions,
};
use tokio::time::timeout;

/// Upper bound for any single database round trip made by a service.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 25;

/// Connection pool settings.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub query_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Shared pool handle that bounds every operation by a query timeout.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    query_timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a database future, failing it if it outlives the query timeout.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error, or an I/O `TimedOut` error when the
    /// deadline passes first.
    pub async fn bounded<T, F>(&self, operation: F) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        timeout(self.query_timeout, operation)
            .await
            .map_err(|_elapsed| timed_out())?
    }

    /// Check out a single pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired in time.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        self.bounded(self.pool.acquire()).await
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails or times out.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.bounded(self.pool.begin()).await
    }

    /// Commit a transaction within the query timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the commit fails or times out.
    pub async fn commit(&self, tx: Transaction<'static, Postgres>) -> Result<(), sqlx::Error> {
        self.bounded(tx.commit()).await
    }
}

fn timed_out() -> sqlx::Error {
    sqlx::Error::Io(io::Error::new(
        io::ErrorKind::TimedOut,
        "database operation timed out",
    ))
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.query_timeout)
        .connect(database_url)
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
