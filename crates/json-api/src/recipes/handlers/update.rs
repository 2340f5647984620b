//! Update Recipe Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use dialed_in_app::{
    domain::recipes::{data::RecipeUpdate, records::MethodId},
    versioning::Version,
};

use crate::{
    extensions::*,
    recipes::{
        errors::{into_status_error, validate_info},
        models::RecipeResponse,
    },
    state::State,
};

/// Update Recipe Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRecipeRequest {
    pub method_id: MethodId,
    #[serde(default)]
    pub coffee_uuid: Option<Uuid>,
    #[salvo(schema(value_type = Object))]
    pub info: Value,
    pub version: i32,
}

impl From<UpdateRecipeRequest> for RecipeUpdate {
    fn from(request: UpdateRecipeRequest) -> Self {
        RecipeUpdate {
            method_id: request.method_id,
            coffee_uuid: request.coffee_uuid.map(Into::into),
            info: request.info,
            version: Version::new(request.version),
        }
    }
}

/// Update Recipe Handler
#[endpoint(
    tags("recipes"),
    summary = "Update Recipe",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Recipe updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Recipe not found"),
        (status_code = StatusCode::CONFLICT, description = "Edit conflict"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid recipe details"),
    ),
)]
#[tracing::instrument(
    name = "recipes.update",
    skip(recipe, json, depot),
    fields(recipe_uuid = tracing::field::Empty, version = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    recipe: PathParam<Uuid>,
    json: JsonBody<UpdateRecipeRequest>,
    depot: &mut Depot,
) -> Result<Json<RecipeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let request = json.into_inner();
    let recipe = recipe.into_inner();

    let span = tracing::Span::current();

    span.record("recipe_uuid", tracing::field::display(recipe));
    span.record("version", request.version);

    validate_info(&request.info)?;

    let updated = state
        .app
        .recipes
        .update_recipe(user.uuid, recipe.into(), request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use dialed_in_app::domain::recipes::{MockRecipesService, RecipesServiceError};

    use crate::test_helpers::{Mocks, make_recipe, user_service};

    use super::*;

    fn make_service(recipes: MockRecipesService) -> TestResult<Service> {
        Ok(user_service(
            Mocks {
                recipes: Some(recipes),
                ..Mocks::default()
            },
            Router::with_path("recipes/{recipe}").put(handler),
        )?)
    }

    #[tokio::test]
    async fn test_update_recipe_bumps_version() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut recipes = MockRecipesService::new();

        recipes
            .expect_update_recipe()
            .once()
            .withf(move |_, recipe, update| {
                recipe.into_uuid() == uuid
                    && update.version == Version::new(4)
                    && update.coffee_uuid.is_none()
            })
            .return_once(move |_, _, update| {
                let mut recipe = make_recipe(uuid);

                recipe.info = update.info;
                recipe.version = update.version.next();

                Ok(recipe)
            });

        let mut res = TestClient::put(format!("http://example.com/recipes/{uuid}"))
            .json(&json!({ "method_id": 1, "info": { "dose": 16 }, "version": 4 }))
            .send(&make_service(recipes)?)
            .await;

        let body: RecipeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.version, 5);
        assert_eq!(body.info, json!({ "dose": 16 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_recipe_stale_version_returns_409() -> TestResult {
        let mut recipes = MockRecipesService::new();

        recipes
            .expect_update_recipe()
            .once()
            .return_once(|_, _, _| Err(RecipesServiceError::EditConflict));

        let res = TestClient::put(format!("http://example.com/recipes/{}", Uuid::now_v7()))
            .json(&json!({ "method_id": 1, "info": {}, "version": 1 }))
            .send(&make_service(recipes)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
