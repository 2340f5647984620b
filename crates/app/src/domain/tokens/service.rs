//! Tokens service.
//!
//! Issues, resolves and revokes scoped bearer tokens. Only the SHA-256 digest
//! of a token is persisted; the plaintext is returned once from
//! [`TokensService::issue_token`].

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::debug;

use crate::{
    auth::AuthenticatedUser,
    database::Db,
    domain::{
        tokens::{
            errors::TokensServiceError,
            plaintext::hash_plaintext,
            records::{Token, TokenScope},
            repository::PgTokensRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgTokensService {
    db: Db,
    repository: PgTokensRepository,
}

impl PgTokensService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTokensRepository::new(),
        }
    }
}

#[async_trait]
impl TokensService for PgTokensService {
    async fn issue_token(
        &self,
        user: UserUuid,
        ttl: SignedDuration,
        scope: TokenScope,
    ) -> Result<Token, TokensServiceError> {
        let token = Token::generate(user, ttl, scope, Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        self.db
            .bounded(self.repository.insert_token(&mut tx, &token))
            .await?;

        self.db.commit(tx).await?;

        debug!(%user, %scope, expiry = %token.expiry, "issued token");

        Ok(token)
    }

    async fn replace_token(
        &self,
        user: UserUuid,
        ttl: SignedDuration,
        scope: TokenScope,
    ) -> Result<Token, TokensServiceError> {
        let token = Token::generate(user, ttl, scope, Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        let revoked = self
            .db
            .bounded(self.repository.delete_tokens_for_user(&mut tx, scope, user))
            .await?;

        self.db
            .bounded(self.repository.insert_token(&mut tx, &token))
            .await?;

        self.db.commit(tx).await?;

        debug!(%user, %scope, revoked, "replaced tokens");

        Ok(token)
    }

    async fn resolve_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<AuthenticatedUser, TokensServiceError> {
        let hash = hash_plaintext(plaintext);

        let mut tx = self.db.begin().await?;

        let user = self
            .db
            .bounded(self.repository.find_user_for_token(&mut tx, &hash, scope))
            .await?
            .ok_or(TokensServiceError::NotFound)?;

        self.db.commit(tx).await?;

        Ok(user)
    }

    async fn revoke_tokens(
        &self,
        scope: TokenScope,
        user: UserUuid,
    ) -> Result<u64, TokensServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self
            .db
            .bounded(self.repository.delete_tokens_for_user(&mut tx, scope, user))
            .await?;

        self.db.commit(tx).await?;

        debug!(%user, %scope, revoked, "revoked tokens");

        Ok(revoked)
    }
}

#[automock]
#[async_trait]
pub trait TokensService: Send + Sync {
    /// Generate and persist a token for `user` valid for `ttl`.
    async fn issue_token(
        &self,
        user: UserUuid,
        ttl: SignedDuration,
        scope: TokenScope,
    ) -> Result<Token, TokensServiceError>;

    /// Revoke every `scope` token of `user` and issue a fresh one, atomically.
    async fn replace_token(
        &self,
        user: UserUuid,
        ttl: SignedDuration,
        scope: TokenScope,
    ) -> Result<Token, TokensServiceError>;

    /// Resolve an unexpired token of `scope` to the user it was issued for.
    async fn resolve_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> Result<AuthenticatedUser, TokensServiceError>;

    /// Delete every `scope` token of `user`, returning how many were removed.
    async fn revoke_tokens(
        &self,
        scope: TokenScope,
        user: UserUuid,
    ) -> Result<u64, TokensServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::tokens::records::TokenScope, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_resolves_to_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let token = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(1), TokenScope::Authentication)
            .await?;

        let resolved = ctx
            .tokens
            .resolve_token(TokenScope::Authentication, token.plaintext.as_str())
            .await?;

        assert_eq!(resolved.uuid, user);
        assert!(resolved.activated);

        Ok(())
    }

    #[tokio::test]
    async fn plaintext_is_never_stored() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let token = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(1), TokenScope::Activation)
            .await?;

        let stored: Vec<u8> = sqlx::query_scalar("SELECT hash FROM tokens WHERE user_uuid = $1")
            .bind(user.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(stored.as_slice(), token.hash.as_bytes().as_slice());
        assert_ne!(stored.as_slice(), token.plaintext.as_str().as_bytes());

        Ok(())
    }

    #[tokio::test]
    async fn scopes_are_disjoint() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", false).await;

        let activation = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(1), TokenScope::Activation)
            .await?;
        let session = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(1), TokenScope::Authentication)
            .await?;

        let as_session = ctx
            .tokens
            .resolve_token(TokenScope::Authentication, activation.plaintext.as_str())
            .await;
        let as_activation = ctx
            .tokens
            .resolve_token(TokenScope::Activation, session.plaintext.as_str())
            .await;

        assert!(matches!(as_session, Err(TokensServiceError::NotFound)));
        assert!(matches!(as_activation, Err(TokensServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_does_not_resolve() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let token = ctx
            .tokens
            .issue_token(user, SignedDuration::from_secs(-1), TokenScope::Authentication)
            .await?;

        let result = ctx
            .tokens
            .resolve_token(TokenScope::Authentication, token.plaintext.as_str())
            .await;

        assert!(matches!(result, Err(TokensServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_fails() {
        let ctx = TestContext::new().await;

        let result = ctx
            .tokens
            .issue_token(
                UserUuid::new(),
                SignedDuration::from_hours(1),
                TokenScope::Authentication,
            )
            .await;

        assert!(matches!(result, Err(TokensServiceError::UnknownUser)));
    }

    #[tokio::test]
    async fn revoked_activation_token_no_longer_resolves() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", false).await;

        let token = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(72), TokenScope::Activation)
            .await?;

        ctx.tokens
            .resolve_token(TokenScope::Activation, token.plaintext.as_str())
            .await?;

        let revoked = ctx.tokens.revoke_tokens(TokenScope::Activation, user).await?;

        let result = ctx
            .tokens
            .resolve_token(TokenScope::Activation, token.plaintext.as_str())
            .await;

        assert_eq!(revoked, 1);
        assert!(matches!(result, Err(TokensServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn revoking_one_scope_keeps_the_others() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", true).await;

        let session = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(1), TokenScope::Authentication)
            .await?;

        ctx.tokens
            .issue_token(user, SignedDuration::from_mins(45), TokenScope::PasswordReset)
            .await?;

        ctx.tokens
            .revoke_tokens(TokenScope::PasswordReset, user)
            .await?;

        let resolved = ctx
            .tokens
            .resolve_token(TokenScope::Authentication, session.plaintext.as_str())
            .await?;

        assert_eq!(resolved.uuid, user);

        Ok(())
    }

    #[tokio::test]
    async fn replace_token_invalidates_previous_tokens() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com", false).await;

        let first = ctx
            .tokens
            .issue_token(user, SignedDuration::from_hours(72), TokenScope::Activation)
            .await?;

        let second = ctx
            .tokens
            .replace_token(user, SignedDuration::from_hours(72), TokenScope::Activation)
            .await?;

        let stale = ctx
            .tokens
            .resolve_token(TokenScope::Activation, first.plaintext.as_str())
            .await;

        let fresh = ctx
            .tokens
            .resolve_token(TokenScope::Activation, second.plaintext.as_str())
            .await?;

        assert!(matches!(stale, Err(TokensServiceError::NotFound)));
        assert_eq!(fresh.uuid, user);

        Ok(())
    }
}
