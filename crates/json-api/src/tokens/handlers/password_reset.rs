//! Request Password Reset Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use dialed_in_app::{domain::tokens::records::TokenScope, mailer::Message};

use crate::{
    errors::invalid_field,
    extensions::*,
    mail::deliver_in_background,
    state::State,
    tokens::{
        errors::{into_status_error, lookup_status_error},
        handlers::{EmailRequest, MessageResponse},
    },
    users::validate_email,
};

/// Request Password Reset Handler
///
/// Mails a six digit reset code. Any earlier code for the account stops
/// working.
#[endpoint(
    tags("tokens"),
    summary = "Request Password Reset",
    responses(
        (status_code = StatusCode::ACCEPTED, description = "Reset mail queued"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Unknown or inactive email"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "tokens.password_reset", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<EmailRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    validate_email(&request.email)?;

    let user = state
        .app
        .users
        .get_user_by_email(&request.email)
        .await
        .map_err(lookup_status_error)?;

    if !user.activated {
        return Err(invalid_field("email", "user account must be activated"));
    }

    let reset = state
        .app
        .tokens
        .replace_token(
            user.uuid,
            state.lifetimes.password_reset,
            TokenScope::PasswordReset,
        )
        .await
        .map_err(into_status_error)?;

    deliver_in_background(
        Arc::clone(&state.app.mailer),
        user.email,
        Message::PasswordReset { reset },
    );

    res.status_code(StatusCode::ACCEPTED);

    Ok(Json(MessageResponse {
        message: "an email will be sent to you containing password reset instructions"
            .to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use dialed_in_app::{
        domain::{
            tokens::MockTokensService,
            users::{MockUsersService, UsersServiceError},
        },
        mailer::MockMailer,
    };

    use crate::test_helpers::{Mocks, TEST_USER_UUID, anonymous_service, make_token, make_user};

    use super::*;

    fn make_service(users: MockUsersService, tokens: MockTokensService) -> TestResult<Service> {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .withf(|_, message| message.scope() == TokenScope::PasswordReset)
            .returning(|_, _| Ok(()));

        Ok(anonymous_service(
            Mocks {
                users: Some(users),
                tokens: Some(tokens),
                mailer: Some(mailer),
                ..Mocks::default()
            },
            Router::with_path("tokens/password-reset").post(handler),
        )?)
    }

    async fn request(users: MockUsersService, tokens: MockTokensService) -> TestResult<Response> {
        Ok(TestClient::post("http://example.com/tokens/password-reset")
            .json(&json!({ "email": "ada@example.com" }))
            .send(&make_service(users, tokens)?)
            .await)
    }

    #[tokio::test]
    async fn test_password_reset_issues_a_fresh_code() -> TestResult {
        let reset = make_token(TokenScope::PasswordReset)?;

        let mut users = MockUsersService::new();

        users
            .expect_get_user_by_email()
            .once()
            .withf(|email| email == "ada@example.com")
            .return_once(|_| Ok(make_user(true)));

        let mut tokens = MockTokensService::new();

        tokens
            .expect_replace_token()
            .once()
            .withf(|user, ttl, scope| {
                *user == TEST_USER_UUID
                    && *ttl == jiff::SignedDuration::from_mins(45)
                    && *scope == TokenScope::PasswordReset
            })
            .return_once(move |_, _, _| Ok(reset));

        let res = request(users, tokens).await?;

        assert_eq!(res.status_code, Some(StatusCode::ACCEPTED));

        Ok(())
    }

    #[tokio::test]
    async fn test_password_reset_unknown_email_returns_422() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_get_user_by_email()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let mut tokens = MockTokensService::new();

        tokens.expect_replace_token().never();

        let res = request(users, tokens).await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_password_reset_inactive_user_returns_422() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_get_user_by_email()
            .once()
            .return_once(|_| Ok(make_user(false)));

        let mut tokens = MockTokensService::new();

        tokens.expect_replace_token().never();

        let res = request(users, tokens).await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
