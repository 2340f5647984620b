//! Coffee Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    coffees::{errors::into_status_error, models::CoffeeResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CoffeesResponse {
    /// The caller's coffees, newest first
    pub coffees: Vec<CoffeeResponse>,
}

/// Coffee Index Handler
#[endpoint(tags("coffees"), summary = "List Coffees", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CoffeesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let coffees = state
        .app
        .coffees
        .list_coffees(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CoffeesResponse {
        coffees: coffees.into_iter().map(Into::into).collect(),
    }))
}
