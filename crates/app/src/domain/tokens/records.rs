//! Token Records

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;
use zeroize::Zeroize;

use crate::domain::{
    tokens::{
        errors::TokensServiceError,
        plaintext::{generate_plaintext, hash_plaintext},
    },
    users::records::UserUuid,
};

/// What a token was issued for. Tokens only resolve against their own scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Authentication,
    Activation,
    PasswordReset,
}

impl TokenScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Activation => "activation",
            Self::PasswordReset => "password-reset",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown token scope: {0}")]
pub struct UnknownTokenScope(String);

impl FromStr for TokenScope {
    type Err = UnknownTokenScope;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "authentication" => Ok(Self::Authentication),
            "activation" => Ok(Self::Activation),
            "password-reset" => Ok(Self::PasswordReset),
            other => Err(UnknownTokenScope(other.to_string())),
        }
    }
}

/// SHA-256 digest of a token plaintext. The only form a token is stored in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenHash(")?;

        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }

        write!(f, "..)")
    }
}

/// Token secret as handed to the client. Never persisted.
#[derive(Clone)]
pub struct TokenPlaintext(String);

impl TokenPlaintext {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TokenPlaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPlaintext(**redacted**)")
    }
}

impl Drop for TokenPlaintext {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Issued token. `plaintext` is only available here, once, at issue time.
#[derive(Debug, Clone)]
pub struct Token {
    pub plaintext: TokenPlaintext,
    pub hash: TokenHash,
    pub user_uuid: UserUuid,
    pub expiry: Timestamp,
    pub scope: TokenScope,
}

impl Token {
    /// Generate a fresh token for `user_uuid` that expires `ttl` after `now`.
    ///
    /// # Errors
    ///
    /// Returns an error when the operating system entropy source fails or the
    /// expiry cannot be represented.
    pub fn generate(
        user_uuid: UserUuid,
        ttl: SignedDuration,
        scope: TokenScope,
        now: Timestamp,
    ) -> Result<Self, TokensServiceError> {
        let expiry = now
            .checked_add(ttl)
            .map_err(TokensServiceError::InvalidLifetime)?;

        let plaintext = generate_plaintext(scope).map_err(TokensServiceError::Entropy)?;
        let hash = hash_plaintext(plaintext.as_str());

        Ok(Self {
            plaintext,
            hash,
            user_uuid,
            expiry,
            scope,
        })
    }
}

/// Default time to live of session tokens.
pub const AUTHENTICATION_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(350);

/// Default time to live of account activation tokens.
pub const ACTIVATION_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(72);

/// Default time to live of password reset codes.
pub const PASSWORD_RESET_TOKEN_TTL: SignedDuration = SignedDuration::from_mins(45);

/// Per-scope token lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub authentication: SignedDuration,
    pub activation: SignedDuration,
    pub password_reset: SignedDuration,
}

impl TokenLifetimes {
    #[must_use]
    pub const fn for_scope(&self, scope: TokenScope) -> SignedDuration {
        match scope {
            TokenScope::Authentication => self.authentication,
            TokenScope::Activation => self.activation,
            TokenScope::PasswordReset => self.password_reset,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            authentication: AUTHENTICATION_TOKEN_TTL,
            activation: ACTIVATION_TOKEN_TTL,
            password_reset: PASSWORD_RESET_TOKEN_TTL,
        }
    }
}
