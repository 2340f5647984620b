//! Brewing Methods Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    recipes::{errors::into_status_error, models::MethodResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MethodsResponse {
    pub methods: Vec<MethodResponse>,
}

/// Brewing Methods Handler
///
/// The catalogue is shared by every user and needs no credentials.
#[endpoint(tags("recipes"), summary = "List Brewing Methods")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<MethodsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let methods = state
        .app
        .recipes
        .list_methods()
        .await
        .map_err(into_status_error)?;

    Ok(Json(MethodsResponse {
        methods: methods.into_iter().map(Into::into).collect(),
    }))
}
