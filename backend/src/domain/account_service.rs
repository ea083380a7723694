//! Account domain service.
//!
//! Implements the account driving ports on top of the user store, the token
//! store and the password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AccountQuery, AuthTokenRepository, AuthTokenRepositoryError, PasswordHasher,
    PasswordHasherError, ProfileChanges, RegisterUserRequest, UserPersistenceError,
    UserRepository,
};
use crate::domain::{AccountFlags, AuthToken, Error, LoginCredentials, User, UserId};

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("a user with this email already exists")
                .with_details(json!({ "field": "email", "code": "unique" }))
        }
    }
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Unknown email, inactive account and wrong password are indistinguishable.
fn invalid_credentials() -> Error {
    Error::invalid_request("unable to authenticate with provided credentials")
        .with_details(json!({ "field": "non_field_errors", "code": "authorization" }))
}

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, T, H> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, T, H> AccountService<U, T, H> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tokens,
            hasher,
            clock,
        }
    }
}

impl<U, T, H> AccountService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
{
    async fn create_account(
        &self,
        request: RegisterUserRequest,
        flags: AccountFlags,
    ) -> Result<User, Error> {
        let RegisterUserRequest {
            email,
            password,
            name,
        } = request;
        let password_hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;
        let user = User::new(UserId::random(), email, name, flags);

        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), superuser = flags.is_superuser, "registered user");
        Ok(user)
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<U, T, H> AccountCommand for AccountService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        self.create_account(request, AccountFlags::regular()).await
    }

    async fn register_superuser(&self, request: RegisterUserRequest) -> Result<User, Error> {
        self.create_account(request, AccountFlags::superuser()).await
    }

    async fn issue_token(&self, credentials: LoginCredentials) -> Result<AuthToken, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("token requested for unknown email");
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified || !stored.user.is_active() {
            debug!(user_id = %stored.user.id(), "token request rejected");
            return Err(invalid_credentials());
        }

        let token = AuthToken::generate();
        self.tokens
            .replace(stored.user.id(), &token.digest(), self.clock.utc())
            .await
            .map_err(map_token_error)?;
        Ok(token)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        let existing = self.load_user(user_id).await?;
        let ProfileChanges { name, password } = changes;
        let name = name.unwrap_or_else(|| existing.name().clone());
        let password_hash = match password.as_ref() {
            Some(plain) => Some(self.hasher.hash(plain).await.map_err(map_hasher_error)?),
            None => None,
        };

        self.users
            .update_profile(user_id, &name, password_hash)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<U, T, H> AccountQuery for AccountService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error> {
        let user = self
            .tokens
            .find_user(&token.digest())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid token"))?;
        if !user.is_active() {
            return Err(Error::unauthorized("user inactive or deleted"));
        }
        Ok(user)
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_user(user_id).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
