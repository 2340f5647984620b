//! Update Coffee Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use dialed_in_app::{domain::coffees::data::CoffeeUpdate, versioning::Version};

use crate::{
    coffees::{
        errors::{into_status_error, validate_info},
        models::CoffeeResponse,
    },
    extensions::*,
    state::State,
};

/// Update Coffee Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCoffeeRequest {
    #[salvo(schema(value_type = Object))]
    pub info: Value,
    /// Version from the caller's last read
    pub version: i32,
}

impl From<UpdateCoffeeRequest> for CoffeeUpdate {
    fn from(request: UpdateCoffeeRequest) -> Self {
        CoffeeUpdate {
            info: request.info,
            version: Version::new(request.version),
        }
    }
}

/// Update Coffee Handler
///
/// Replaces the coffee only if `version` is still current; a stale version
/// is answered with 409 and the stored coffee is left untouched.
#[endpoint(
    tags("coffees"),
    summary = "Update Coffee",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coffee updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coffee not found"),
        (status_code = StatusCode::CONFLICT, description = "Edit conflict"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid coffee details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "coffees.update",
    skip(coffee, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        coffee_uuid = tracing::field::Empty,
        version = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    coffee: PathParam<Uuid>,
    json: JsonBody<UpdateCoffeeRequest>,
    depot: &mut Depot,
) -> Result<Json<CoffeeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let request = json.into_inner();
    let coffee = coffee.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("coffee_uuid", tracing::field::display(coffee));
    span.record("version", request.version);

    validate_info(&request.info)?;

    let updated = state
        .app
        .coffees
        .update_coffee(user.uuid, coffee.into(), request.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(version = updated.version.get(), "updated coffee");

    Ok(Json(updated.into()))
}
