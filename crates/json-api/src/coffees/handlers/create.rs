//! Create Coffee Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dialed_in_app::domain::coffees::data::NewCoffee;

use crate::{
    coffees::{
        errors::{into_status_error, validate_info},
        models::CoffeeResponse,
    },
    extensions::*,
    state::State,
};

/// Create Coffee Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCoffeeRequest {
    #[salvo(schema(value_type = Object))]
    pub info: Value,
}

impl From<CreateCoffeeRequest> for NewCoffee {
    fn from(request: CreateCoffeeRequest) -> Self {
        NewCoffee { info: request.info }
    }
}

/// Create Coffee Handler
#[endpoint(
    tags("coffees"),
    summary = "Create Coffee",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coffee created"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid coffee details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCoffeeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CoffeeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let request = json.into_inner();

    validate_info(&request.info)?;

    let coffee = state
        .app
        .coffees
        .create_coffee(user.uuid, request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/v1/coffees/{}", coffee.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(coffee.into()))
}
