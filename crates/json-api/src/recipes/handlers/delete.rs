//! Delete Recipe Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, recipes::errors::into_status_error, state::State};

/// Delete Recipe Handler
#[endpoint(
    tags("recipes"),
    summary = "Delete Recipe",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Recipe deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Recipe not found"),
    ),
)]
pub(crate) async fn handler(
    recipe: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    state
        .app
        .recipes
        .delete_recipe(user.uuid, recipe.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use dialed_in_app::domain::recipes::{MockRecipesService, RecipesServiceError};

    use crate::test_helpers::{Mocks, user_service};

    use super::*;

    #[tokio::test]
    async fn test_delete_missing_recipe_returns_404() -> TestResult {
        let mut recipes = MockRecipesService::new();

        recipes
            .expect_delete_recipe()
            .once()
            .return_once(|_, _| Err(RecipesServiceError::NotFound));

        let service = user_service(
            Mocks {
                recipes: Some(recipes),
                ..Mocks::default()
            },
            Router::with_path("recipes/{recipe}").delete(handler),
        )?;

        let res = TestClient::delete(format!("http://example.com/recipes/{}", Uuid::now_v7()))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
