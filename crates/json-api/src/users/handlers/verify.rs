//! Verify Session Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_status_error},
};

/// Verify Session Handler
///
/// Returns the profile behind the presented session token.
#[endpoint(
    tags("users"),
    summary = "Verify Session",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Token is valid"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let user = state
        .app
        .users
        .get_user(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
