//! Get Coffee Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    coffees::{errors::into_status_error, models::CoffeeResponse},
    extensions::*,
    state::State,
};

/// Get Coffee Handler
#[endpoint(
    tags("coffees"),
    summary = "Get Coffee",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coffee found"),
        (status_code = StatusCode::NOT_FOUND, description = "Coffee not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    coffee: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CoffeeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let coffee = state
        .app
        .coffees
        .get_coffee(user.uuid, coffee.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coffee.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use dialed_in_app::domain::coffees::{CoffeesServiceError, MockCoffeesService};

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_coffee, user_service};

    use super::*;

    fn make_service(coffees: MockCoffeesService) -> TestResult<Service> {
        Ok(user_service(
            Mocks {
                coffees: Some(coffees),
                ..Mocks::default()
            },
            Router::with_path("coffees/{coffee}").get(handler),
        )?)
    }

    #[tokio::test]
    async fn test_get_coffee_success() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut coffees = MockCoffeesService::new();

        coffees
            .expect_get_coffee()
            .once()
            .withf(move |user, coffee| *user == TEST_USER_UUID && coffee.into_uuid() == uuid)
            .return_once(move |_, _| Ok(make_coffee(uuid)));

        let mut res = TestClient::get(format!("http://example.com/coffees/{uuid}"))
            .send(&make_service(coffees)?)
            .await;

        let body: CoffeeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid);
        assert_eq!(body.version, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_coffee_not_found_returns_404() -> TestResult {
        let mut coffees = MockCoffeesService::new();

        coffees
            .expect_get_coffee()
            .once()
            .return_once(|_, _| Err(CoffeesServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/coffees/{}", Uuid::now_v7()))
            .send(&make_service(coffees)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_coffee_invalid_uuid_returns_400() -> TestResult {
        let mut coffees = MockCoffeesService::new();

        coffees.expect_get_coffee().never();

        let res = TestClient::get("http://example.com/coffees/123")
            .send(&make_service(coffees)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
