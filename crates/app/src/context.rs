//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db, PoolSettings},
    domain::{
        coffees::{CoffeesService, PgCoffeesService},
        recipes::{PgRecipesService, RecipesService},
        tokens::{PgTokensService, TokensService},
        users::{PgUsersService, UsersService},
    },
    mailer::{Mailer, TracingMailer},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub tokens: Arc<dyn TokensService>,
    pub users: Arc<dyn UsersService>,
    pub coffees: Arc<dyn CoffeesService>,
    pub recipes: Arc<dyn RecipesService>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppContext {
    /// Build the Postgres-backed services around a shared [`Db`].
    #[must_use]
    pub fn from_db(db: &Db) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            tokens: Arc::new(PgTokensService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            coffees: Arc::new(PgCoffeesService::new(db.clone())),
            recipes: Arc::new(PgRecipesService::new(db.clone())),
            mailer: Arc::new(TracingMailer),
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_database_url(
        url: &str,
        settings: PoolSettings,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, settings)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool).with_query_timeout(settings.query_timeout);

        Ok(Self::from_db(&db))
    }
}
