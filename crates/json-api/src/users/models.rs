//! User request validation and response bodies.

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dialed_in_app::domain::users::records::User;

use crate::errors::invalid_field;

const MAX_NAME_BYTES: usize = 500;
const MAX_EMAIL_BYTES: usize = 254;
const MIN_PASSWORD_BYTES: usize = 8;
const MAX_PASSWORD_BYTES: usize = 72;

/// User Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// User UUID
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    /// Whether the account has been activated
    pub activated: bool,
    /// RFC 3339 creation time
    pub created_at: String,
    /// Version to send back with the next update
    pub version: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            activated: user.activated,
            created_at: user.created_at.to_string(),
            version: user.version.get(),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), StatusError> {
    if name.trim().is_empty() {
        return Err(invalid_field("name", "must be provided"));
    }

    if name.len() > MAX_NAME_BYTES {
        return Err(invalid_field("name", "must not be more than 500 bytes long"));
    }

    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), StatusError> {
    if email.is_empty() {
        return Err(invalid_field("email", "must be provided"));
    }

    let well_formed = email.len() <= MAX_EMAIL_BYTES
        && !email.contains(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.contains('@')
            });

    if !well_formed {
        return Err(invalid_field("email", "must be a valid email address"));
    }

    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), StatusError> {
    if password.is_empty() {
        return Err(invalid_field("password", "must be provided"));
    }

    if password.len() < MIN_PASSWORD_BYTES {
        return Err(invalid_field("password", "must be at least 8 bytes long"));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(invalid_field("password", "must not be more than 72 bytes long"));
    }

    Ok(())
}
