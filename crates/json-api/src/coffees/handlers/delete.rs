//! Delete Coffee Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{coffees::errors::into_status_error, extensions::*, state::State};

/// Delete Coffee Handler
#[endpoint(
    tags("coffees"),
    summary = "Delete Coffee",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coffee deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Coffee not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coffee: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    state
        .app
        .coffees
        .delete_coffee(user.uuid, coffee.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
