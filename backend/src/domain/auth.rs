//! Authentication primitives: credentials, passwords and API tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{EmailAddress, UserValidationError};

/// Minimum number of characters accepted for a new password.
pub const PASSWORD_MIN_LENGTH: usize = 5;

/// Number of random bytes behind an issued token.
const TOKEN_BYTES: usize = 20;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Domain error returned when a new password is unacceptable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// Password was shorter than [`PASSWORD_MIN_LENGTH`].
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Validated login credentials used to issue tokens.
///
/// ## Invariants
/// - `email` is normalised the same way as at registration.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Cook@Example.com", "pass123").unwrap();
/// assert_eq!(creds.email().as_ref(), "cook@example.com");
/// assert_eq!(creds.password(), "pass123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plain-text password accepted for a new or changed account password.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate the password length.
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// Encoded password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hasher or read from storage.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Opaque bearer token handed to clients.
///
/// Only the [`TokenDigest`] is stored; the token itself is shown once.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Generate a new random token of 40 lowercase hex characters.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        OsRng.fill_bytes(bytes.as_mut_slice());
        Self(Zeroizing::new(hex::encode(bytes.as_slice())))
    }

    /// Wrap a token presented by a client. Returns `None` for blank input.
    #[must_use]
    pub fn from_presented(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Storage digest for this token.
    #[must_use]
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Hex-encoded SHA-256 digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read from storage.
    #[must_use]
    pub fn from_stored(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("not-an-email", "pw")]
    fn invalid_email_is_rejected(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid email must fail");
        assert!(matches!(err, LoginValidationError::Email(_)));
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = LoginCredentials::try_from_parts("cook@example.com", "")
            .expect_err("empty password must fail");
        assert_eq!(err, LoginValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("pw", false)]
    #[case("1234", false)]
    #[case("12345", true)]
    #[case("correct horse battery staple", true)]
    fn password_length_is_enforced(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(PlainPassword::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn generated_tokens_are_forty_hex_characters() {
        let token = AuthToken::generate();
        assert_eq!(token.as_str().len(), 40);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.as_str(), token.as_str().to_lowercase());
    }

    #[rstest]
    fn generated_tokens_differ() {
        assert_ne!(AuthToken::generate().as_str(), AuthToken::generate().as_str());
    }

    #[rstest]
    fn digest_is_stable_sha256_hex() {
        let token = AuthToken::from_presented("abc").expect("token");
        assert_eq!(
            token.digest().as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[rstest]
    fn blank_presented_token_is_none() {
        assert!(AuthToken::from_presented("   ").is_none());
    }

    #[rstest]
    fn secrets_are_redacted_in_debug_output() {
        let token = AuthToken::generate();
        assert!(!format!("{token:?}").contains(token.as_str()));
        let password = PlainPassword::new("secret-value").expect("valid");
        assert!(!format!("{password:?}").contains("secret-value"));
    }
}
