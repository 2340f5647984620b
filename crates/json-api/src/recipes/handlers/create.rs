//! Create Recipe Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use dialed_in_app::domain::recipes::{data::NewRecipe, records::MethodId};

use crate::{
    extensions::*,
    recipes::{
        errors::{into_status_error, validate_info},
        models::RecipeResponse,
    },
    state::State,
};

/// Create Recipe Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateRecipeRequest {
    pub method_id: MethodId,
    #[serde(default)]
    pub coffee_uuid: Option<Uuid>,
    #[salvo(schema(value_type = Object))]
    pub info: Value,
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(request: CreateRecipeRequest) -> Self {
        NewRecipe {
            method_id: request.method_id,
            coffee_uuid: request.coffee_uuid.map(Into::into),
            info: request.info,
        }
    }
}

/// Create Recipe Handler
#[endpoint(
    tags("recipes"),
    summary = "Create Recipe",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Recipe created"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid recipe details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateRecipeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RecipeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let request = json.into_inner();

    validate_info(&request.info)?;

    let recipe = state
        .app
        .recipes
        .create_recipe(user.uuid, request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/v1/recipes/{}", recipe.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(recipe.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use dialed_in_app::domain::recipes::{MockRecipesService, RecipesServiceError};

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_recipe, user_service};

    use super::*;

    fn make_service(recipes: MockRecipesService) -> TestResult<Service> {
        Ok(user_service(
            Mocks {
                recipes: Some(recipes),
                ..Mocks::default()
            },
            Router::with_path("recipes").post(handler),
        )?)
    }

    #[tokio::test]
    async fn test_create_recipe_with_coffee() -> TestResult {
        let uuid = Uuid::now_v7();
        let coffee = Uuid::now_v7();

        let mut recipes = MockRecipesService::new();

        recipes
            .expect_create_recipe()
            .once()
            .withf(move |user, new| {
                *user == TEST_USER_UUID
                    && new.method_id == 2
                    && new.coffee_uuid.map(|c| c.into_uuid()) == Some(coffee)
            })
            .return_once(move |_, new| {
                let mut recipe = make_recipe(uuid);

                recipe.method_id = new.method_id;
                recipe.coffee_uuid = new.coffee_uuid;

                Ok(recipe)
            });

        let mut res = TestClient::post("http://example.com/recipes")
            .json(&json!({
                "method_id": 2,
                "coffee_uuid": coffee,
                "info": { "dose": 18, "water": 300 }
            }))
            .send(&make_service(recipes)?)
            .await;

        let body: RecipeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.coffee_uuid, Some(coffee));
        assert_eq!(body.method_id, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_recipe_unknown_method_returns_422() -> TestResult {
        let mut recipes = MockRecipesService::new();

        recipes
            .expect_create_recipe()
            .once()
            .return_once(|_, _| Err(RecipesServiceError::UnknownMethod));

        let mut res = TestClient::post("http://example.com/recipes")
            .json(&json!({ "method_id": 99, "info": {} }))
            .send(&make_service(recipes)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(
            res.take_string().await?.contains("method_id"),
            "expected the failing field to be named"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_recipe_foreign_coffee_returns_422() -> TestResult {
        let mut recipes = MockRecipesService::new();

        recipes
            .expect_create_recipe()
            .once()
            .return_once(|_, _| Err(RecipesServiceError::UnknownCoffee));

        let res = TestClient::post("http://example.com/recipes")
            .json(&json!({ "method_id": 1, "coffee_uuid": Uuid::now_v7(), "info": {} }))
            .send(&make_service(recipes)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
