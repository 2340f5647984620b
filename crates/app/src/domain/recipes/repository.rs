//! Recipes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::domain::{
    coffees::records::CoffeeUuid,
    recipes::{
        data::{NewRecipe, RecipeUpdate},
        records::{Method, MethodId, Recipe, RecipeUuid},
    },
    users::records::UserUuid,
};

const LIST_METHODS_SQL: &str = include_str!("sql/list_methods.sql");
const METHOD_EXISTS_SQL: &str = include_str!("sql/method_exists.sql");
const COFFEE_OWNED_BY_USER_SQL: &str = include_str!("sql/coffee_owned_by_user.sql");
const LIST_RECIPES_SQL: &str = include_str!("sql/list_recipes.sql");
const GET_RECIPE_SQL: &str = include_str!("sql/get_recipe.sql");
const CREATE_RECIPE_SQL: &str = include_str!("sql/create_recipe.sql");
const UPDATE_RECIPE_SQL: &str = include_str!("sql/update_recipe.sql");
const DELETE_RECIPE_SQL: &str = include_str!("sql/delete_recipe.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRecipesRepository;

impl PgRecipesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_methods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Method>, sqlx::Error> {
        query_as::<Postgres, Method>(LIST_METHODS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn method_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: MethodId,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(METHOD_EXISTS_SQL)
            .bind(method)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn coffee_owned_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(COFFEE_OWNED_BY_USER_SQL)
            .bind(coffee.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_recipes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        query_as::<Postgres, Recipe>(LIST_RECIPES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_recipe(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<Recipe, sqlx::Error> {
        query_as::<Postgres, Recipe>(GET_RECIPE_SQL)
            .bind(recipe.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_recipe(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        recipe: RecipeUuid,
        data: &NewRecipe,
    ) -> Result<Recipe, sqlx::Error> {
        query_as::<Postgres, Recipe>(CREATE_RECIPE_SQL)
            .bind(recipe.into_uuid())
            .bind(user.into_uuid())
            .bind(data.method_id)
            .bind(data.coffee_uuid.map(CoffeeUuid::into_uuid))
            .bind(&data.info)
            .fetch_one(&mut **tx)
            .await
    }

    /// Conditional update; `None` when `update.version` is no longer current.
    pub(crate) async fn update_recipe(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        recipe: RecipeUuid,
        update: &RecipeUpdate,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        query_as::<Postgres, Recipe>(UPDATE_RECIPE_SQL)
            .bind(recipe.into_uuid())
            .bind(user.into_uuid())
            .bind(update.version)
            .bind(update.method_id)
            .bind(update.coffee_uuid.map(CoffeeUuid::into_uuid))
            .bind(&update.info)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_recipe(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RECIPE_SQL)
            .bind(recipe.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Method {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Recipe {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RecipeUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            method_id: row.try_get("method_id")?,
            coffee_uuid: row
                .try_get::<Option<Uuid>, _>("coffee_uuid")?
                .map(CoffeeUuid::from_uuid),
            info: row.try_get("info")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            version: row.try_get("version")?,
        })
    }
}
