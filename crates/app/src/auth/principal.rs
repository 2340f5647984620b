//! Request principals and the access gates evaluated against them.

use thiserror::Error;

use crate::domain::users::records::UserUuid;

/// A user resolved from a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uuid: UserUuid,
    pub activated: bool,
}

/// Identity attached to a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedUser),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("you must be authenticated to access this resource")]
    AuthenticationRequired,

    #[error("your user account must be activated to access this feature")]
    ActivationRequired,
}

impl Principal {
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// # Errors
    ///
    /// Returns [`AccessError::AuthenticationRequired`] for anonymous principals.
    pub const fn require_authenticated(&self) -> Result<AuthenticatedUser, AccessError> {
        match self {
            Self::Authenticated(user) => Ok(*user),
            Self::Anonymous => Err(AccessError::AuthenticationRequired),
        }
    }

    /// Authentication is checked before activation; anonymous principals have
    /// no activation state.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AuthenticationRequired`] for anonymous principals
    /// and [`AccessError::ActivationRequired`] for inactive accounts.
    pub const fn require_activated(&self) -> Result<AuthenticatedUser, AccessError> {
        match self.require_authenticated() {
            Ok(user) if user.activated => Ok(user),
            Ok(_) => Err(AccessError::ActivationRequired),
            Err(error) => Err(error),
        }
    }
}

impl From<AuthenticatedUser> for Principal {
    fn from(user: AuthenticatedUser) -> Self {
        Self::Authenticated(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(activated: bool) -> Principal {
        Principal::Authenticated(AuthenticatedUser {
            uuid: UserUuid::new(),
            activated,
        })
    }

    #[test]
    fn anonymous_fails_both_gates_as_unauthenticated() {
        let principal = Principal::default();

        assert!(principal.is_anonymous());
        assert_eq!(
            principal.require_authenticated(),
            Err(AccessError::AuthenticationRequired)
        );
        assert_eq!(
            principal.require_activated(),
            Err(AccessError::AuthenticationRequired)
        );
    }

    #[test]
    fn inactive_user_passes_authentication_only() {
        let principal = user(false);

        assert!(principal.require_authenticated().is_ok());
        assert_eq!(
            principal.require_activated(),
            Err(AccessError::ActivationRequired)
        );
    }

    #[test]
    fn activated_user_passes_both_gates() {
        let principal = user(true);

        assert!(principal.require_authenticated().is_ok());
        assert!(principal.require_activated().is_ok());
    }
}
