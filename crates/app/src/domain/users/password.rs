//! Password hashing.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{self, PasswordHash, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("entropy source failure")]
    Entropy(#[source] rand::Error),

    #[error("password hashing failed")]
    Hash(#[source] password_hash::Error),
}

/// Hash `password` into a PHC string with a random salt.
///
/// # Errors
///
/// Returns an error when salt generation or hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0_u8; 16];

    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(PasswordError::Entropy)?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(PasswordError::Hash)?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?
        .to_string();

    Ok(phc)
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
#[must_use]
pub fn verify_password(phc: &str, password: &str) -> bool {
    PasswordHash::new(phc).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
