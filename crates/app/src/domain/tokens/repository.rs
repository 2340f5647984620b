//! Tokens Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Row, Transaction, query};

use crate::{
    auth::AuthenticatedUser,
    domain::{
        tokens::records::{Token, TokenHash, TokenScope},
        users::records::UserUuid,
    },
};

const INSERT_TOKEN_SQL: &str = include_str!("sql/insert_token.sql");
const FIND_USER_FOR_TOKEN_SQL: &str = include_str!("sql/find_user_for_token.sql");
const DELETE_TOKENS_FOR_USER_SQL: &str = include_str!("sql/delete_tokens_for_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTokensRepository;

impl PgTokensRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &Token,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_TOKEN_SQL)
            .bind(token.hash.as_bytes().as_slice())
            .bind(token.user_uuid.into_uuid())
            .bind(SqlxTimestamp::from(token.expiry))
            .bind(token.scope.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Single read resolving an unexpired `(hash, scope)` pair to its user.
    pub(crate) async fn find_user_for_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        hash: &TokenHash,
        scope: TokenScope,
    ) -> Result<Option<AuthenticatedUser>, sqlx::Error> {
        let row = query(FIND_USER_FOR_TOKEN_SQL)
            .bind(hash.as_bytes().as_slice())
            .bind(scope.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(AuthenticatedUser {
                uuid: UserUuid::from_uuid(row.try_get("uuid")?),
                activated: row.try_get("activated")?,
            })
        })
        .transpose()
    }

    pub(crate) async fn delete_tokens_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: TokenScope,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_TOKENS_FOR_USER_SQL)
            .bind(scope.as_str())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
