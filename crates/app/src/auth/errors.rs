//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Malformed, unknown, expired or wrong-scope token.
    #[error("invalid or missing authentication token")]
    InvalidToken,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
