//! Port abstraction for user account persistence and its errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, PersonName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this normalised email.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
    }
}

/// Stored account together with the password hash used to verify logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The account.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

/// Port for reading and writing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` when the email is taken.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Look up an account and its hash by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Update the display name and, when given, the password hash.
    ///
    /// Returns `None` when the account no longer exists.
    async fn update_profile(
        &self,
        id: &UserId,
        name: &PersonName,
        password_hash: Option<PasswordHash>,
    ) -> Result<Option<User>, UserPersistenceError>;
}
