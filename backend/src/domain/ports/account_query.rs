//! Driving port for account reads.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, User, UserId};

/// Domain use-case port for token resolution and profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Resolve a presented token to its active owner.
    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error>;

    /// Load the profile of an authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
