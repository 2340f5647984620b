//! Recipes service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        coffees::records::CoffeeUuid,
        recipes::{
            data::{NewRecipe, RecipeUpdate},
            errors::RecipesServiceError,
            records::{Method, MethodId, Recipe, RecipeUuid},
            repository::PgRecipesRepository,
        },
        users::records::UserUuid,
    },
    versioning::conditional_update,
};

#[derive(Debug, Clone)]
pub struct PgRecipesService {
    db: Db,
    repository: PgRecipesRepository,
}

impl PgRecipesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgRecipesRepository::new(),
        }
    }

    async fn check_references(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        method: MethodId,
        coffee: Option<CoffeeUuid>,
    ) -> Result<(), RecipesServiceError> {
        if !self
            .db
            .bounded(self.repository.method_exists(tx, method))
            .await?
        {
            return Err(RecipesServiceError::UnknownMethod);
        }

        if let Some(coffee) = coffee
            && !self
                .db
                .bounded(self.repository.coffee_owned_by_user(tx, user, coffee))
                .await?
        {
            return Err(RecipesServiceError::UnknownCoffee);
        }

        Ok(())
    }
}

#[async_trait]
impl RecipesService for PgRecipesService {
    async fn list_methods(&self) -> Result<Vec<Method>, RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        let methods = self
            .db
            .bounded(self.repository.list_methods(&mut tx))
            .await?;

        self.db.commit(tx).await?;

        Ok(methods)
    }

    async fn list_recipes(&self, user: UserUuid) -> Result<Vec<Recipe>, RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        let recipes = self
            .db
            .bounded(self.repository.list_recipes(&mut tx, user))
            .await?;

        self.db.commit(tx).await?;

        Ok(recipes)
    }

    async fn get_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<Recipe, RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        let recipe = self
            .db
            .bounded(self.repository.get_recipe(&mut tx, user, recipe))
            .await?;

        self.db.commit(tx).await?;

        Ok(recipe)
    }

    async fn create_recipe(
        &self,
        user: UserUuid,
        recipe: NewRecipe,
    ) -> Result<Recipe, RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        self.check_references(&mut tx, user, recipe.method_id, recipe.coffee_uuid)
            .await?;

        let created = self
            .db
            .bounded(
                self.repository
                    .create_recipe(&mut tx, user, RecipeUuid::new(), &recipe),
            )
            .await?;

        self.db.commit(tx).await?;

        Ok(created)
    }

    async fn update_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
        update: RecipeUpdate,
    ) -> Result<Recipe, RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        self.db
            .bounded(self.repository.get_recipe(&mut tx, user, recipe))
            .await?;

        self.check_references(&mut tx, user, update.method_id, update.coffee_uuid)
            .await?;

        let updated = conditional_update(
            self.db
                .bounded(self.repository.update_recipe(&mut tx, user, recipe, &update)),
        )
        .await?;

        self.db.commit(tx).await?;

        Ok(updated)
    }

    async fn delete_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<(), RecipesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .db
            .bounded(self.repository.delete_recipe(&mut tx, user, recipe))
            .await?;

        if rows_affected == 0 {
            return Err(RecipesServiceError::NotFound);
        }

        self.db.commit(tx).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait RecipesService: Send + Sync {
    /// Retrieves the known brewing methods.
    async fn list_methods(&self) -> Result<Vec<Method>, RecipesServiceError>;

    /// Retrieves all of a user's recipes, newest first.
    async fn list_recipes(&self, user: UserUuid) -> Result<Vec<Recipe>, RecipesServiceError>;

    /// Retrieve a single recipe owned by `user`.
    async fn get_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<Recipe, RecipesServiceError>;

    /// Creates a recipe. The method must exist and the coffee, when given,
    /// must belong to `user`.
    async fn create_recipe(
        &self,
        user: UserUuid,
        recipe: NewRecipe,
    ) -> Result<Recipe, RecipesServiceError>;

    /// Replaces a recipe if `update.version` is still current.
    async fn update_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
        update: RecipeUpdate,
    ) -> Result<Recipe, RecipesServiceError>;

    /// Deletes a recipe.
    async fn delete_recipe(
        &self,
        user: UserUuid,
        recipe: RecipeUuid,
    ) -> Result<(), RecipesServiceError>;
}
