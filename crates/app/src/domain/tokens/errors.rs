//! Tokens service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokensServiceError {
    /// Wrong token, wrong scope or expired. Deliberately indistinguishable.
    #[error("token not found")]
    NotFound,

    #[error("token subject does not exist")]
    UnknownUser,

    #[error("token lifetime out of range")]
    InvalidLifetime(#[source] jiff::Error),

    #[error("entropy source failure")]
    Entropy(#[source] rand::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for TokensServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownUser,
            Some(_) | None => Self::Sql(error),
        }
    }
}
