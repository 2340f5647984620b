//! Coffees service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        coffees::{
            data::{CoffeeUpdate, NewCoffee},
            errors::CoffeesServiceError,
            records::{Coffee, CoffeeUuid},
            repository::PgCoffeesRepository,
        },
        users::records::UserUuid,
    },
    versioning::conditional_update,
};

#[derive(Debug, Clone)]
pub struct PgCoffeesService {
    db: Db,
    repository: PgCoffeesRepository,
}

impl PgCoffeesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCoffeesRepository::new(),
        }
    }
}

#[async_trait]
impl CoffeesService for PgCoffeesService {
    async fn list_coffees(&self, user: UserUuid) -> Result<Vec<Coffee>, CoffeesServiceError> {
        let mut tx = self.db.begin().await?;

        let coffees = self
            .db
            .bounded(self.repository.list_coffees(&mut tx, user))
            .await?;

        self.db.commit(tx).await?;

        Ok(coffees)
    }

    async fn get_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<Coffee, CoffeesServiceError> {
        let mut tx = self.db.begin().await?;

        let coffee = self
            .db
            .bounded(self.repository.get_coffee(&mut tx, user, coffee))
            .await?;

        self.db.commit(tx).await?;

        Ok(coffee)
    }

    async fn create_coffee(
        &self,
        user: UserUuid,
        coffee: NewCoffee,
    ) -> Result<Coffee, CoffeesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .db
            .bounded(
                self.repository
                    .create_coffee(&mut tx, user, CoffeeUuid::new(), &coffee.info),
            )
            .await?;

        self.db.commit(tx).await?;

        Ok(created)
    }

    async fn update_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
        update: CoffeeUpdate,
    ) -> Result<Coffee, CoffeesServiceError> {
        let mut tx = self.db.begin().await?;

        self.db
            .bounded(self.repository.get_coffee(&mut tx, user, coffee))
            .await?;

        let updated = conditional_update(self.db.bounded(self.repository.update_coffee(
            &mut tx,
            user,
            coffee,
            update.version,
            &update.info,
        )))
        .await?;

        self.db.commit(tx).await?;

        Ok(updated)
    }

    async fn delete_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<(), CoffeesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .db
            .bounded(self.repository.delete_coffee(&mut tx, user, coffee))
            .await?;

        if rows_affected == 0 {
            return Err(CoffeesServiceError::NotFound);
        }

        self.db.commit(tx).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CoffeesService: Send + Sync {
    /// Retrieves all of a user's coffees, newest first.
    async fn list_coffees(&self, user: UserUuid) -> Result<Vec<Coffee>, CoffeesServiceError>;

    /// Retrieve a single coffee owned by `user`.
    async fn get_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<Coffee, CoffeesServiceError>;

    /// Creates a new coffee at version 1.
    async fn create_coffee(
        &self,
        user: UserUuid,
        coffee: NewCoffee,
    ) -> Result<Coffee, CoffeesServiceError>;

    /// Replaces a coffee's details if `update.version` is still current.
    async fn update_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
        update: CoffeeUpdate,
    ) -> Result<Coffee, CoffeesServiceError>;

    /// Deletes a coffee.
    async fn delete_coffee(
        &self,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<(), CoffeesServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::{test::TestContext, versioning::Version};

    use super::*;

    #[tokio::test]
    async fn create_coffee_starts_at_version_one() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let coffee = ctx
            .coffees
            .create_coffee(
                user,
                NewCoffee {
                    info: json!({ "name": "Kiamabara", "roaster": "Square Mile" }),
                },
            )
            .await?;

        assert_eq!(coffee.user_uuid, user);
        assert_eq!(coffee.version, Version::INITIAL);
        assert_eq!(coffee.info["roaster"], "Square Mile");

        Ok(())
    }

    #[tokio::test]
    async fn coffees_are_scoped_to_their_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let ada = ctx.create_user("ada@example.com", true).await;
        let grace = ctx.create_user("grace@example.com", true).await;

        let coffee = ctx
            .coffees
            .create_coffee(ada, NewCoffee { info: json!({}) })
            .await?;

        let as_other = ctx.coffees.get_coffee(grace, coffee.uuid).await;

        assert!(matches!(as_other, Err(CoffeesServiceError::NotFound)));
        assert!(ctx.coffees.list_coffees(grace).await?.is_empty());
        assert_eq!(ctx.coffees.list_coffees(ada).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_with_read_version_succeeds() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let coffee = ctx
            .coffees
            .create_coffee(user, NewCoffee { info: json!({ "name": "A" }) })
            .await?;

        let updated = ctx
            .coffees
            .update_coffee(
                user,
                coffee.uuid,
                CoffeeUpdate {
                    info: json!({ "name": "B" }),
                    version: coffee.version,
                },
            )
            .await?;

        assert_eq!(updated.version, coffee.version.next());
        assert_eq!(updated.info["name"], "B");

        Ok(())
    }

    #[tokio::test]
    async fn stale_version_is_an_edit_conflict() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let coffee = ctx
            .coffees
            .create_coffee(user, NewCoffee { info: json!({ "name": "A" }) })
            .await?;

        let first_read = ctx.coffees.get_coffee(user, coffee.uuid).await?;
        let second_read = ctx.coffees.get_coffee(user, coffee.uuid).await?;

        ctx.coffees
            .update_coffee(
                user,
                coffee.uuid,
                CoffeeUpdate {
                    info: json!({ "name": "first" }),
                    version: first_read.version,
                },
            )
            .await?;

        let second_write = ctx
            .coffees
            .update_coffee(
                user,
                coffee.uuid,
                CoffeeUpdate {
                    info: json!({ "name": "second" }),
                    version: second_read.version,
                },
            )
            .await;

        let stored = ctx.coffees.get_coffee(user, coffee.uuid).await?;

        assert!(matches!(second_write, Err(CoffeesServiceError::EditConflict)));
        assert_eq!(stored.info["name"], "first");
        assert_eq!(stored.version, Version::new(2));

        Ok(())
    }

    #[tokio::test]
    async fn update_missing_coffee_is_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let result = ctx
            .coffees
            .update_coffee(
                user,
                CoffeeUuid::new(),
                CoffeeUpdate {
                    info: json!({}),
                    version: Version::INITIAL,
                },
            )
            .await;

        assert!(matches!(result, Err(CoffeesServiceError::NotFound)));
    }

    #[tokio::test]
    async fn delete_coffee_removes_it() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let coffee = ctx
            .coffees
            .create_coffee(user, NewCoffee { info: json!({}) })
            .await?;

        ctx.coffees.delete_coffee(user, coffee.uuid).await?;

        let again = ctx.coffees.delete_coffee(user, coffee.uuid).await;

        assert!(matches!(again, Err(CoffeesServiceError::NotFound)));

        Ok(())
    }
}
