//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    domain::users::records::{User, UserUuid},
    versioning::Version,
};

const INSERT_USER_SQL: &str = include_str!("sql/insert_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const GET_USER_BY_EMAIL_SQL: &str = include_str!("sql/get_user_by_email.sql");
const GET_PASSWORD_HASH_SQL: &str = include_str!("sql/get_password_hash.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(INSERT_USER_SQL)
            .bind(uuid.into_uuid())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_password_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
    ) -> Result<String, sqlx::Error> {
        query_scalar(GET_PASSWORD_HASH_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Conditional update; `None` when `expected` is no longer current.
    pub(crate) async fn update_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &User,
        expected: Version,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(UPDATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(expected)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.activated)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Conditional update; `None` when `expected` is no longer current.
    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
        expected: Version,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(UPDATE_PASSWORD_SQL)
            .bind(uuid.into_uuid())
            .bind(expected)
            .bind(password_hash)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            activated: row.try_get("activated")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            version: row.try_get("version")?,
        })
    }
}
