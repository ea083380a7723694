//! Driving port for account mutations: registration, token issue and
//! profile updates.
//!
//! Inbound adapters call it without knowing the backing infrastructure, so
//! HTTP handler tests can substitute a double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{
    AuthToken, EmailAddress, Error, LoginCredentials, PersonName, PlainPassword, User, UserId,
};

/// Validated sign-up request.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    /// Login email.
    pub email: EmailAddress,
    /// Initial password.
    pub password: PlainPassword,
    /// Display name, possibly empty.
    pub name: PersonName,
}

/// Validated profile changes; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New display name.
    pub name: Option<PersonName>,
    /// New password.
    pub password: Option<PlainPassword>,
}

/// Domain use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a regular active account.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Create an active staff superuser.
    async fn register_superuser(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Verify credentials and issue a fresh token, replacing any previous one.
    async fn issue_token(&self, credentials: LoginCredentials) -> Result<AuthToken, Error>;

    /// Apply profile changes to the given account.
    async fn update_profile(&self, user_id: &UserId, changes: ProfileChanges)
    -> Result<User, Error>;
}
