//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use dialed_in_app::domain::{
    tokens::{plaintext::validate_plaintext, records::TokenScope},
    users::UsersServiceError,
};

use crate::{
    errors::invalid_field,
    extensions::*,
    state::State,
    users::{errors::into_status_error, validate_password},
};

/// Reset Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordRequest {
    /// New password
    pub password: String,
    /// Six digit reset code from the reset mail
    pub token: String,
}

/// Reset Password Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordResponse {
    pub message: String,
}

/// Reset Password Handler
///
/// Redeeming the code also signs the user out everywhere.
#[endpoint(
    tags("users"),
    summary = "Reset Password",
    responses(
        (status_code = StatusCode::OK, description = "Password reset"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Malformed, unknown or expired code"),
        (status_code = StatusCode::CONFLICT, description = "Edit conflict"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "users.reset_password", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<ResetPasswordResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    validate_password(&request.password)?;
    validate_plaintext(TokenScope::PasswordReset, &request.token)
        .map_err(|format| invalid_field("token", format))?;

    let user = state
        .app
        .users
        .reset_password(&request.token, &request.password)
        .await
        .map_err(|error| match error {
            UsersServiceError::InvalidToken => {
                invalid_field("token", "invalid or expired password reset token")
            }
            other => into_status_error(other),
        })?;

    tracing::info!(user = %user.uuid, "password reset");

    Ok(Json(ResetPasswordResponse {
        message: "your password was successfully reset".to_owned(),
    }))
}
