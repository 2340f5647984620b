//! Coffees Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        coffees::records::{Coffee, CoffeeUuid},
        users::records::UserUuid,
    },
    versioning::Version,
};

const LIST_COFFEES_SQL: &str = include_str!("sql/list_coffees.sql");
const GET_COFFEE_SQL: &str = include_str!("sql/get_coffee.sql");
const CREATE_COFFEE_SQL: &str = include_str!("sql/create_coffee.sql");
const UPDATE_COFFEE_SQL: &str = include_str!("sql/update_coffee.sql");
const DELETE_COFFEE_SQL: &str = include_str!("sql/delete_coffee.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCoffeesRepository;

impl PgCoffeesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coffees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Coffee>, sqlx::Error> {
        query_as::<Postgres, Coffee>(LIST_COFFEES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_coffee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<Coffee, sqlx::Error> {
        query_as::<Postgres, Coffee>(GET_COFFEE_SQL)
            .bind(coffee.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_coffee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        coffee: CoffeeUuid,
        info: &Value,
    ) -> Result<Coffee, sqlx::Error> {
        query_as::<Postgres, Coffee>(CREATE_COFFEE_SQL)
            .bind(coffee.into_uuid())
            .bind(user.into_uuid())
            .bind(info)
            .fetch_one(&mut **tx)
            .await
    }

    /// Conditional update; `None` when `expected` is no longer current.
    pub(crate) async fn update_coffee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        coffee: CoffeeUuid,
        expected: Version,
        info: &Value,
    ) -> Result<Option<Coffee>, sqlx::Error> {
        query_as::<Postgres, Coffee>(UPDATE_COFFEE_SQL)
            .bind(coffee.into_uuid())
            .bind(user.into_uuid())
            .bind(expected)
            .bind(info)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_coffee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        coffee: CoffeeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_COFFEE_SQL)
            .bind(coffee.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Coffee {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CoffeeUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            info: row.try_get("info")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            version: row.try_get("version")?,
        })
    }
}
