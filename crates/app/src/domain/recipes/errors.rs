//! Recipes service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::versioning::VersionedUpdateError;

#[derive(Debug, Error)]
pub enum RecipesServiceError {
    #[error("recipe not found")]
    NotFound,

    #[error("unknown brewing method")]
    UnknownMethod,

    #[error("unknown coffee")]
    UnknownCoffee,

    #[error("related resource not found")]
    InvalidReference,

    #[error("edit conflict")]
    EditConflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RecipesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<VersionedUpdateError> for RecipesServiceError {
    fn from(error: VersionedUpdateError) -> Self {
        match error {
            VersionedUpdateError::EditConflict => Self::EditConflict,
            VersionedUpdateError::Sql(error) => Self::from(error),
        }
    }
}
