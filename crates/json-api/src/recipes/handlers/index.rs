//! Recipe Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    recipes::{errors::into_status_error, models::RecipeResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecipesResponse {
    pub recipes: Vec<RecipeResponse>,
}

/// Recipe Index Handler
#[endpoint(tags("recipes"), summary = "List Recipes", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RecipesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let recipes = state
        .app
        .recipes
        .list_recipes(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(RecipesResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use dialed_in_app::domain::recipes::MockRecipesService;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_recipe, user_service};

    use super::*;

    #[tokio::test]
    async fn test_list_recipes() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut recipes = MockRecipesService::new();

        recipes
            .expect_list_recipes()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(vec![make_recipe(uuid)]));

        let service = user_service(
            Mocks {
                recipes: Some(recipes),
                ..Mocks::default()
            },
            Router::with_path("recipes").get(handler),
        )?;

        let mut res = TestClient::get("http://example.com/recipes")
            .send(&service)
            .await;

        let body: RecipesResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.recipes.len(), 1);
        assert_eq!(body.recipes.first().map(|recipe| recipe.uuid), Some(uuid));

        Ok(())
    }
}
