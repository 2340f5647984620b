//! Auth service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{AuthServiceError, AuthenticatedUser},
    database::Db,
    domain::tokens::{
        plaintext::{hash_plaintext, validate_plaintext},
        records::TokenScope,
        repository::PgTokensRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgTokensRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTokensRepository::new(),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        validate_plaintext(TokenScope::Authentication, bearer_token)
            .map_err(|_format| AuthServiceError::InvalidToken)?;

        let hash = hash_plaintext(bearer_token);

        let mut tx = self.db.begin().await?;

        let user = self
            .db
            .bounded(self.repository.find_user_for_token(
                &mut tx,
                &hash,
                TokenScope::Authentication,
            ))
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        self.db.commit(tx).await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a session token presented as a bearer credential.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;
}
