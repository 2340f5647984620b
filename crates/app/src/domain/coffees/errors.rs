//! Coffees service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::versioning::VersionedUpdateError;

#[derive(Debug, Error)]
pub enum CoffeesServiceError {
    #[error("coffee already exists")]
    AlreadyExists,

    #[error("coffee not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("edit conflict")]
    EditConflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CoffeesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<VersionedUpdateError> for CoffeesServiceError {
    fn from(error: VersionedUpdateError) -> Self {
        match error {
            VersionedUpdateError::EditConflict => Self::EditConflict,
            VersionedUpdateError::Sql(error) => Self::from(error),
        }
    }
}
