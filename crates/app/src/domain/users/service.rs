//! Users service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tokio::task::spawn_blocking;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        tokens::{
            plaintext::hash_plaintext,
            records::{Token, TokenScope},
            repository::PgTokensRepository,
        },
        users::{
            data::{NewUser, RegisteredUser, UserUpdate},
            errors::UsersServiceError,
            password::{hash_password, verify_password},
            records::{User, UserUuid},
            repository::PgUsersRepository,
        },
    },
    versioning::conditional_update,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    users: PgUsersRepository,
    tokens: PgTokensRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            tokens: PgTokensRepository::new(),
        }
    }

    async fn hash(password: &str) -> Result<String, UsersServiceError> {
        let password = password.to_string();

        Ok(spawn_blocking(move || hash_password(&password)).await??)
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register_user(
        &self,
        user: NewUser,
        activation_ttl: SignedDuration,
    ) -> Result<RegisteredUser, UsersServiceError> {
        let password_hash = Self::hash(&user.password).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .db
            .bounded(self.users.insert_user(
                &mut tx,
                UserUuid::new(),
                &user.name,
                &user.email,
                &password_hash,
            ))
            .await?;

        let activation_token = Token::generate(
            created.uuid,
            activation_ttl,
            TokenScope::Activation,
            Timestamp::now(),
        )?;

        self.db
            .bounded(self.tokens.insert_token(&mut tx, &activation_token))
            .await?;

        self.db.commit(tx).await?;

        info!(user = %created.uuid, "registered user");

        Ok(RegisteredUser {
            user: created,
            activation_token,
        })
    }

    async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = match self
            .db
            .bounded(self.users.get_user_by_email(&mut tx, email))
            .await
        {
            Ok(user) => user,
            Err(sqlx::Error::RowNotFound) => return Err(UsersServiceError::InvalidCredentials),
            Err(error) => return Err(error.into()),
        };

        let phc = self
            .db
            .bounded(self.users.get_password_hash(&mut tx, user.uuid))
            .await?;

        self.db.commit(tx).await?;

        let password = password.to_string();
        let matches = spawn_blocking(move || verify_password(&phc, &password)).await?;

        if !matches {
            return Err(UsersServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.db.bounded(self.users.get_user(&mut tx, user)).await?;

        self.db.commit(tx).await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .db
            .bounded(self.users.get_user_by_email(&mut tx, email))
            .await?;

        self.db.commit(tx).await?;

        Ok(user)
    }

    async fn activate_user(&self, plaintext: &str) -> Result<User, UsersServiceError> {
        let hash = hash_plaintext(plaintext);

        let mut tx = self.db.begin().await?;

        let subject = self
            .db
            .bounded(
                self.tokens
                    .find_user_for_token(&mut tx, &hash, TokenScope::Activation),
            )
            .await?
            .ok_or(UsersServiceError::InvalidToken)?;

        let mut user = self
            .db
            .bounded(self.users.get_user(&mut tx, subject.uuid))
            .await?;

        let expected = user.version;
        user.activated = true;

        let user = conditional_update(
            self.db
                .bounded(self.users.update_user(&mut tx, &user, expected)),
        )
        .await?;

        self.db
            .bounded(
                self.tokens
                    .delete_tokens_for_user(&mut tx, TokenScope::Activation, user.uuid),
            )
            .await?;

        self.db.commit(tx).await?;

        info!(user = %user.uuid, "activated user");

        Ok(user)
    }

    async fn reset_password(
        &self,
        plaintext: &str,
        password: &str,
    ) -> Result<User, UsersServiceError> {
        let hash = hash_plaintext(plaintext);
        let password_hash = Self::hash(password).await?;

        let mut tx = self.db.begin().await?;

        let subject = self
            .db
            .bounded(
                self.tokens
                    .find_user_for_token(&mut tx, &hash, TokenScope::PasswordReset),
            )
            .await?
            .ok_or(UsersServiceError::InvalidToken)?;

        let current = self
            .db
            .bounded(self.users.get_user(&mut tx, subject.uuid))
            .await?;

        let user = conditional_update(self.db.bounded(self.users.update_password(
            &mut tx,
            current.uuid,
            current.version,
            &password_hash,
        )))
        .await?;

        for scope in [TokenScope::PasswordReset, TokenScope::Authentication] {
            self.db
                .bounded(self.tokens.delete_tokens_for_user(&mut tx, scope, user.uuid))
                .await?;
        }

        self.db.commit(tx).await?;

        info!(user = %user.uuid, "reset password");

        Ok(user)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.db.bounded(self.users.get_user(&mut tx, user)).await?;

        if let Some(name) = update.name {
            current.name = name;
        }

        if let Some(email) = update.email {
            current.email = email;
        }

        let updated = conditional_update(
            self.db
                .bounded(self.users.update_user(&mut tx, &current, update.version)),
        )
        .await?;

        self.db.commit(tx).await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create an inactive user and an activation token for it in one transaction.
    async fn register_user(
        &self,
        user: NewUser,
        activation_ttl: SignedDuration,
    ) -> Result<RegisteredUser, UsersServiceError>;

    /// Check an email and password pair.
    async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Retrieve a single user by (case-insensitive) email address.
    async fn get_user_by_email(&self, email: &str) -> Result<User, UsersServiceError>;

    /// Redeem an activation token and revoke every other one of the user's.
    async fn activate_user(&self, plaintext: &str) -> Result<User, UsersServiceError>;

    /// Redeem a password reset code, then revoke all reset and session tokens.
    async fn reset_password(
        &self,
        plaintext: &str,
        password: &str,
    ) -> Result<User, UsersServiceError>;

    /// Update profile fields, conditioned on the caller's last read version.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<User, UsersServiceError>;
}
