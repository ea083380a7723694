//! Port for storing API token digests and resolving them to users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenDigest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "auth token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "auth token repository query failed: {message}",
    }
}

/// Port for the one-token-per-user store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Store `digest` as the user's token, replacing any previous one.
    async fn replace(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Resolve a digest to the owning user.
    async fn find_user(&self, digest: &TokenDigest)
    -> Result<Option<User>, AuthTokenRepositoryError>;
}
