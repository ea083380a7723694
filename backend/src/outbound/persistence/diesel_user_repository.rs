//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    AccountFlags, EmailAddress, PasswordHash, PersonName, User, UserId,
};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with, unique_violation};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error_with(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error_with(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a stored row into a validated domain user.
pub(super) fn row_to_user(row: &UserRow) -> Result<User, String> {
    let email = EmailAddress::new(&row.email).map_err(|err| err.to_string())?;
    let name = PersonName::new(&row.name).map_err(|err| err.to_string())?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        name,
        AccountFlags {
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        },
    ))
}

fn decode_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    row_to_user(row).map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let flags = user.flags();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            password_hash: password_hash.as_str(),
            name: user.name().as_ref(),
            is_active: flags.is_active,
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if let Some(constraint) = unique_violation(&err) {
                    debug!(constraint, "user insert hit unique constraint");
                    return UserPersistenceError::duplicate_email(user.email().as_ref());
                }
                map_diesel_error(err)
            })
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Ok(StoredCredentials {
                user: decode_user(&row)?,
                password_hash: PasswordHash::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(decode_user).transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        name: &PersonName,
        password_hash: Option<PasswordHash>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileUpdate {
            name: name.as_ref(),
            password_hash: password_hash.as_ref().map(PasswordHash::as_str),
            updated_at: Utc::now(),
        };

        let row = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(decode_user).transpose()
    }
}
