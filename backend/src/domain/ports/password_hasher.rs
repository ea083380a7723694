//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{PasswordHash, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed or a stored hash could not be decoded.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Port for hashing new passwords and verifying presented ones.
///
/// Adapters with a deliberately slow hash keep that work off the async
/// executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce an encoded hash for storage.
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a presented password against a stored hash.
    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
