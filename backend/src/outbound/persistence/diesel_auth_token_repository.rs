//! PostgreSQL-backed `AuthTokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{TokenDigest, User, UserId};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::diesel_user_repository::row_to_user;
use super::models::{NewAuthTokenRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Diesel-backed implementation of the auth token repository port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenRepositoryError {
    map_pool_error_with(error, AuthTokenRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    map_diesel_error_with(
        error,
        AuthTokenRepositoryError::query,
        AuthTokenRepositoryError::connection,
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn replace(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAuthTokenRow {
            user_id: *user_id.as_uuid(),
            digest: digest.as_str(),
            created_at: issued_at,
        };

        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .on_conflict(auth_tokens::user_id)
            .do_update()
            .set((
                auth_tokens::digest.eq(excluded(auth_tokens::digest)),
                auth_tokens::created_at.eq(excluded(auth_tokens::created_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<User>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::digest.eq(digest.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref()
            .map(|row| row_to_user(row).map_err(AuthTokenRepositoryError::query))
            .transpose()
    }
}
