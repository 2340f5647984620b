//! User Errors

use salvo::http::StatusError;
use tracing::error;

use dialed_in_app::domain::users::UsersServiceError;

use crate::errors::{edit_conflict, invalid_field};

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::DuplicateEmail => {
            invalid_field("email", "a user with this email address already exists")
        }
        UsersServiceError::NotFound => StatusError::not_found(),
        UsersServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("invalid authentication credentials")
        }
        UsersServiceError::InvalidToken => invalid_field("token", "invalid or expired token"),
        UsersServiceError::EditConflict => edit_conflict(),
        error @ (UsersServiceError::Password(_)
        | UsersServiceError::Task(_)
        | UsersServiceError::Tokens(_)
        | UsersServiceError::Sql(_)) => {
            error!("users service failure: {error:?}");

            StatusError::internal_server_error()
        }
    }
}
