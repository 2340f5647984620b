//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tokio::task::JoinError;

use crate::{
    domain::{tokens::TokensServiceError, users::password::PasswordError},
    versioning::VersionedUpdateError,
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("a user with this email address already exists")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error("invalid authentication credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("edit conflict")]
    EditConflict,

    #[error("password error")]
    Password(#[from] PasswordError),

    #[error("password task failed")]
    Task(#[from] JoinError),

    #[error("token error")]
    Tokens(#[source] TokensServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateEmail,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<VersionedUpdateError> for UsersServiceError {
    fn from(error: VersionedUpdateError) -> Self {
        match error {
            VersionedUpdateError::EditConflict => Self::EditConflict,
            VersionedUpdateError::Sql(error) => Self::from(error),
        }
    }
}

impl From<TokensServiceError> for UsersServiceError {
    fn from(error: TokensServiceError) -> Self {
        match error {
            TokensServiceError::Sql(error) => Self::from(error),
            other => Self::Tokens(other),
        }
    }
}
