//! Token plaintext generation, hashing and shape validation.

use data_encoding::BASE32_NOPAD;
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::domain::tokens::records::{TokenHash, TokenPlaintext, TokenScope};

/// Random bytes behind a session or activation token.
pub const TOKEN_SECRET_BYTES: usize = 16;

/// Length of an unpadded base-32 encoding of [`TOKEN_SECRET_BYTES`].
pub const TOKEN_PLAINTEXT_CHARS: usize = 26;

/// Number of digits in a password reset code.
pub const RESET_CODE_DIGITS: usize = 6;

const RESET_CODE_SPAN: u32 = 900_000;
const RESET_CODE_FLOOR: u32 = 100_000;

/// Structural problems with a presented token, reported before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFormatError {
    #[error("must be provided")]
    Missing,

    #[error("must be 26 characters long")]
    WrongLength,

    #[error("must be 6 digits")]
    NotSixDigits,
}

/// Generate a fresh plaintext for `scope`.
///
/// Session and activation tokens are 16 random bytes as unpadded base-32.
/// Password reset tokens are six digit codes.
///
/// # Errors
///
/// Returns an error when the operating system entropy source fails.
pub fn generate_plaintext(scope: TokenScope) -> Result<TokenPlaintext, rand::Error> {
    match scope {
        TokenScope::Authentication | TokenScope::Activation => {
            let mut secret = [0_u8; TOKEN_SECRET_BYTES];

            OsRng.try_fill_bytes(&mut secret)?;

            let encoded = BASE32_NOPAD.encode(&secret);
            secret.zeroize();

            Ok(TokenPlaintext::new(encoded))
        }
        TokenScope::PasswordReset => {
            let mut seed = [0_u8; 4];

            OsRng.try_fill_bytes(&mut seed)?;

            let code = u32::from_be_bytes(seed) % RESET_CODE_SPAN + RESET_CODE_FLOOR;
            seed.zeroize();

            Ok(TokenPlaintext::new(code.to_string()))
        }
    }
}

#[must_use]
pub fn hash_plaintext(plaintext: &str) -> TokenHash {
    TokenHash::from_bytes(Sha256::digest(plaintext.as_bytes()).into())
}

/// Check the shape of a presented token for `scope`.
///
/// # Errors
///
/// Returns the first structural problem found. Emptiness is always checked
/// first.
pub fn validate_plaintext(scope: TokenScope, plaintext: &str) -> Result<(), TokenFormatError> {
    if plaintext.is_empty() {
        return Err(TokenFormatError::Missing);
    }

    match scope {
        TokenScope::Authentication | TokenScope::Activation => {
            if plaintext.len() != TOKEN_PLAINTEXT_CHARS {
                return Err(TokenFormatError::WrongLength);
            }
        }
        TokenScope::PasswordReset => {
            if plaintext.len() != RESET_CODE_DIGITS
                || !plaintext.bytes().all(|byte| byte.is_ascii_digit())
            {
                return Err(TokenFormatError::NotSixDigits);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_are_26_base32_characters() {
        for scope in [TokenScope::Authentication, TokenScope::Activation] {
            let plaintext = generate_plaintext(scope).expect("entropy should be available");

            assert_eq!(plaintext.as_str().len(), TOKEN_PLAINTEXT_CHARS);
            assert!(
                plaintext
                    .as_str()
                    .bytes()
                    .all(|byte| byte.is_ascii_uppercase() || (b'2'..=b'7').contains(&byte)),
                "unexpected character in token"
            );
        }
    }

    #[test]
    fn reset_codes_are_six_digits() {
        for _ in 0..64 {
            let plaintext =
                generate_plaintext(TokenScope::PasswordReset).expect("entropy should be available");
            let code: u32 = plaintext.as_str().parse().expect("code should be numeric");

            assert_eq!(plaintext.as_str().len(), RESET_CODE_DIGITS);
            assert!((100_000..1_000_000).contains(&code));
        }
    }

    #[test]
    fn generated_tokens_differ() {
        let first = generate_plaintext(TokenScope::Authentication).expect("entropy");
        let second = generate_plaintext(TokenScope::Authentication).expect("entropy");

        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn base32_matches_rfc4648_without_padding() {
        assert_eq!(BASE32_NOPAD.encode(b""), "");
        assert_eq!(BASE32_NOPAD.encode(b"f"), "MY");
        assert_eq!(BASE32_NOPAD.encode(b"foo"), "MZXW6");
        assert_eq!(BASE32_NOPAD.encode(b"foobar"), "MZXW6YTBOI");
        assert_eq!(
            BASE32_NOPAD.encode(&[0xff; TOKEN_SECRET_BYTES]),
            "77777777777777777777777774"
        );
        assert_eq!(
            BASE32_NOPAD.encode_len(TOKEN_SECRET_BYTES),
            TOKEN_PLAINTEXT_CHARS
        );
    }

    #[test]
    fn hash_is_sha256_of_plaintext() {
        let hash = hash_plaintext("abc");

        assert_eq!(
            hash.as_bytes()[..4],
            [0xba, 0x78, 0x16, 0xbf],
            "sha256(\"abc\") starts with ba7816bf"
        );
    }

    #[test]
    fn empty_input_must_be_provided_for_every_scope() {
        for scope in [
            TokenScope::Authentication,
            TokenScope::Activation,
            TokenScope::PasswordReset,
        ] {
            assert_eq!(validate_plaintext(scope, ""), Err(TokenFormatError::Missing));
        }
    }

    #[test]
    fn session_tokens_must_be_26_characters() {
        assert_eq!(
            validate_plaintext(TokenScope::Authentication, "ABC"),
            Err(TokenFormatError::WrongLength)
        );
        assert_eq!(
            validate_plaintext(TokenScope::Activation, &"A".repeat(26)),
            Ok(())
        );
    }

    #[test]
    fn reset_codes_must_be_six_digits() {
        assert_eq!(
            validate_plaintext(TokenScope::PasswordReset, "12345"),
            Err(TokenFormatError::NotSixDigits)
        );
        assert_eq!(
            validate_plaintext(TokenScope::PasswordReset, "12345a"),
            Err(TokenFormatError::NotSixDigits)
        );
        assert_eq!(validate_plaintext(TokenScope::PasswordReset, "123456"), Ok(()));
    }

    #[test]
    fn reset_code_is_not_a_session_token() {
        assert_eq!(
            validate_plaintext(TokenScope::Authentication, "123456"),
            Err(TokenFormatError::WrongLength)
        );
    }
}
