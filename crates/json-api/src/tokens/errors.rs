//! Token Errors

use salvo::http::StatusError;
use tracing::error;

use dialed_in_app::domain::{tokens::TokensServiceError, users::UsersServiceError};

use crate::errors::invalid_field;

pub(crate) fn into_status_error(error: TokensServiceError) -> StatusError {
    error!("failed to issue token: {error:?}");

    StatusError::internal_server_error()
}

/// Lookup by email for re-issuing a token. Unknown addresses are a
/// validation failure on the `email` field.
pub(crate) fn lookup_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::NotFound => invalid_field("email", "no matching email address found"),
        other => crate::users::into_status_error(other),
    }
}
