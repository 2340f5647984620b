//! Database Config

use std::time::Duration;

use clap::Args;

use dialed_in_app::database::{DEFAULT_MAX_CONNECTIONS, PoolSettings};

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,

    /// Upper bound on any single database operation, in seconds
    #[arg(long, env = "DB_QUERY_TIMEOUT_SECONDS", default_value_t = 3_u64)]
    pub db_query_timeout_seconds: u64,

    /// Apply pending migrations on startup
    #[arg(long, env = "DB_RUN_MIGRATIONS", default_value_t = false)]
    pub db_run_migrations: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            query_timeout: Duration::from_secs(self.db_query_timeout_seconds),
        }
    }
}
