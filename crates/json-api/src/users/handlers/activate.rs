//! Activate User Handler

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
    users::{UserResponse, errors::into_status_error},
};

/// Activate User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ActivateUserRequest {
    /// Activation token from the welcome mail
    pub token: String,
}

/// Activate User Handler
#[endpoint(
    tags("users"),
    summary = "Activate User",
    responses(
        (status_code = StatusCode::OK, description = "User activated"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Malformed, unknown or expired token"),
        (status_code = StatusCode::CONFLICT, description = "Edit conflict"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "users.activate", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ActivateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    validate_plaintext(TokenScope::Activation, &request.token)
        .map_err(|format| invalid_field("token", format))?;

    let user = state
        .app
        .users
        .activate_user(&request.token)
        .await
        .map_err(|error| match error {
            UsersServiceError::InvalidToken => {
                invalid_field("token", "invalid or expired activation token")
            }
            other => into_status_error(other),
        })?;

    tracing::info!(user = %user.uuid, "activated user");

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use dialed_in_app::domain::users::MockUsersService;

    use crate::{
        errors::EDIT_CONFLICT_MESSAGE,
        test_helpers::{Mocks, anonymous_service, make_user},
    };

    use super::*;

    const TOKEN: &str = "Y3QMGX3PJ3WLRL2YRTQGQ6KRHU";

    fn make_service(users: MockUsersService) -> TestResult<Service> {
        Ok(anonymous_service(
            Mocks {
                users: Some(users),
                ..Mocks::default()
            },
            Router::with_path("users/activated").put(handler),
        )?)
    }

    async fn activate(users: MockUsersService, token: &str) -> TestResult<Response> {
        Ok(TestClient::put("http://example.com/users/activated")
            .json(&json!({ "token": token }))
            .send(&make_service(users)?)
            .await)
    }

    #[tokio::test]
    async fn test_activate_user_success() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_activate_user()
            .once()
            .withf(|token| token == TOKEN)
            .return_once(|_| Ok(make_user(true)));

        let mut res = activate(users, TOKEN).await?;
        let user: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(user.activated, "user should be activated");

        Ok(())
    }

    #[tokio::test]
    async fn test_activate_user_validates_shape_before_lookup() -> TestResult {
        for (token, brief) in [
            ("", "token: must be provided"),
            ("TOOSHORT", "token: must be 26 characters long"),
        ] {
            let mut users = MockUsersService::new();

            users.expect_activate_user().never();

            let mut res = activate(users, token).await?;

            assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
            assert!(
                res.take_string().await?.contains(brief),
                "expected {brief:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_activate_user_unknown_token_returns_422() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_activate_user()
            .once()
            .return_once(|_| Err(UsersServiceError::InvalidToken));

        let res = activate(users, TOKEN).await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_activate_user_conflict_returns_409() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_activate_user()
            .once()
            .return_once(|_| Err(UsersServiceError::EditConflict));

        let mut res = activate(users, TOKEN).await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert!(
            res.take_string().await?.contains(EDIT_CONFLICT_MESSAGE),
            "expected the edit conflict message"
        );

        Ok(())
    }
}
