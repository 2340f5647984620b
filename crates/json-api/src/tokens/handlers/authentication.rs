//! Create Session Token Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use dialed_in_app::domain::tokens::records::TokenScope;

use crate::{
    extensions::*,
    state::State,
    tokens::errors::into_status_error,
    users::{self, validate_email},
};

/// Create Session Token Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAuthenticationTokenRequest {
    pub email: String,
    pub password: String,
}

/// Issued session token. The plaintext is only ever returned here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthenticationToken {
    pub token: String,
    /// RFC 3339 expiry
    pub expiry: String,
}

/// Create Session Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthenticationTokenResponse {
    pub authentication_token: AuthenticationToken,
}

/// Create Session Token Handler
#[endpoint(
    tags("tokens"),
    summary = "Create Session Token",
    responses(
        (status_code = StatusCode::CREATED, description = "Session token issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "tokens.authentication", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<CreateAuthenticationTokenRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthenticationTokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    validate_email(&request.email)?;

    if request.password.is_empty() {
        return Err(crate::errors::invalid_field("password", "must be provided"));
    }

    let user = state
        .app
        .users
        .authenticate_user(&request.email, &request.password)
        .await
        .map_err(users::into_status_error)?;

    let token = state
        .app
        .tokens
        .issue_token(
            user.uuid,
            state.lifetimes.authentication,
            TokenScope::Authentication,
        )
        .await
        .map_err(into_status_error)?;

    tracing::info!(user = %user.uuid, "issued session token");

    res.status_code(StatusCode::CREATED);

    Ok(Json(AuthenticationTokenResponse {
        authentication_token: AuthenticationToken {
            token: token.plaintext.as_str().to_owned(),
            expiry: token.expiry.to_string(),
        },
    }))
}
