//! Update Profile Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use dialed_in_app::{domain::users::data::UserUpdate, versioning::Version};

use crate::{
    errors::invalid_field,
    extensions::*,
    state::State,
    users::{
        UserResponse,
        errors::into_status_error,
        models::{validate_email, validate_name},
    },
};

/// Update Profile Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Version from the caller's last read
    pub version: i32,
}

impl UpdateUserRequest {
    fn validate(&self) -> Result<(), StatusError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        if let Some(email) = &self.email {
            validate_email(email)?;
        }

        if self.version < Version::INITIAL.get() {
            return Err(invalid_field("version", "must be a positive integer"));
        }

        Ok(())
    }
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        UserUpdate {
            name: request.name,
            email: request.email,
            version: Version::new(request.version),
        }
    }
}

/// Update Profile Handler
#[endpoint(
    tags("users"),
    summary = "Update Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::CONFLICT, description = "Edit conflict"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.update",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty, version = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.activated_user_or_403()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("version", request.version);

    request.validate()?;

    let updated = state
        .app
        .users
        .update_user(user.uuid, request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
