//! Register User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use dialed_in_app::{domain::users::data::NewUser, mailer::Message};

use crate::{
    extensions::*,
    mail::deliver_in_background,
    state::State,
    users::{
        UserResponse,
        errors::into_status_error,
        models::{validate_email, validate_name, validate_password},
    },
};

/// Register User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserRequest {
    fn validate(&self) -> Result<(), StatusError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

impl From<RegisterUserRequest> for NewUser {
    fn from(request: RegisterUserRequest) -> Self {
        NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Register User Handler
///
/// Creates an inactive account and mails its activation token.
#[endpoint(
    tags("users"),
    summary = "Register User",
    responses(
        (status_code = StatusCode::ACCEPTED, description = "User registered, activation mail queued"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid or duplicate details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterUserRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    request.validate()?;

    let registered = state
        .app
        .users
        .register_user(request.into(), state.lifetimes.activation)
        .await
        .map_err(into_status_error)?;

    let user = registered.user;

    deliver_in_background(
        Arc::clone(&state.app.mailer),
        user.email.clone(),
        Message::Welcome {
            name: user.name.clone(),
            activation: registered.activation_token,
        },
    );

    info!(user = %user.uuid, "registered user");

    res.status_code(StatusCode::ACCEPTED);

    Ok(Json(user.into()))
}
