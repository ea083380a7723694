//! PostgreSQL-backed `LabelRepository` implementation using Diesel ORM.
//!
//! Tags and ingredients live in separate tables with identical shapes; the
//! `label_queries!` macro expands the same query against either pair of
//! label and link tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LabelRepository, LabelRepositoryError};
use crate::domain::{
    Label, LabelFilter, LabelId, LabelKind, LabelName, UserId, sort_for_listing,
};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{LabelRow, NewIngredientRow, NewTagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the label repository port.
#[derive(Clone)]
pub struct DieselLabelRepository {
    pool: DbPool,
}

impl DieselLabelRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LabelRepositoryError {
    map_pool_error_with(error, LabelRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LabelRepositoryError {
    map_diesel_error_with(
        error,
        LabelRepositoryError::query,
        LabelRepositoryError::connection,
    )
}

/// Convert a stored row into a domain label.
pub(super) fn row_to_label(row: LabelRow) -> Result<Label, String> {
    let name = LabelName::new(&row.name).map_err(|err| err.to_string())?;
    Ok(Label::new(
        LabelId::new(row.id),
        UserId::from_uuid(row.user_id),
        name,
    ))
}

fn decode_labels(rows: Vec<LabelRow>) -> Result<Vec<Label>, LabelRepositoryError> {
    rows.into_iter()
        .map(|row| row_to_label(row).map_err(LabelRepositoryError::query))
        .collect()
}

macro_rules! label_queries {
    ($module:ident, $table:ident, $links:ident, $link_column:ident, $new_row:ident) => {
        mod $module {
            use super::*;

            pub(super) async fn list(
                conn: &mut AsyncPgConnection,
                owner: Uuid,
                assigned_only: bool,
            ) -> QueryResult<Vec<LabelRow>> {
                let mut query = $table::table
                    .filter($table::user_id.eq(owner))
                    .select(($table::id, $table::user_id, $table::name))
                    .into_boxed();
                if assigned_only {
                    // Only links from the owner's own recipes count.
                    let assigned = $links::table
                        .inner_join(recipes::table)
                        .filter(recipes::user_id.eq(owner))
                        .select($links::$link_column);
                    query = query.filter($table::id.eq_any(assigned));
                }
                query.load::<LabelRow>(conn).await
            }

            pub(super) async fn insert(
                conn: &mut AsyncPgConnection,
                owner: Uuid,
                name: &str,
            ) -> QueryResult<LabelRow> {
                diesel::insert_into($table::table)
                    .values($new_row {
                        user_id: owner,
                        name,
                    })
                    .returning(($table::id, $table::user_id, $table::name))
                    .get_result::<LabelRow>(conn)
                    .await
            }

            pub(super) async fn find(
                conn: &mut AsyncPgConnection,
                owner: Uuid,
                id: i64,
            ) -> QueryResult<Option<LabelRow>> {
                $table::table
                    .filter($table::user_id.eq(owner))
                    .filter($table::id.eq(id))
                    .select(($table::id, $table::user_id, $table::name))
                    .first::<LabelRow>(conn)
                    .await
                    .optional()
            }

            pub(super) async fn rename(
                conn: &mut AsyncPgConnection,
                owner: Uuid,
                id: i64,
                name: &str,
            ) -> QueryResult<Option<LabelRow>> {
                diesel::update(
                    $table::table
                        .filter($table::user_id.eq(owner))
                        .filter($table::id.eq(id)),
                )
                .set($table::name.eq(name))
                .returning(($table::id, $table::user_id, $table::name))
                .get_result::<LabelRow>(conn)
                .await
                .optional()
            }

            pub(super) async fn find_owned(
                conn: &mut AsyncPgConnection,
                owner: Uuid,
                ids: Vec<i64>,
            ) -> QueryResult<Vec<i64>> {
                $table::table
                    .filter($table::user_id.eq(owner))
                    .filter($table::id.eq_any(ids))
                    .select($table::id)
                    .load::<i64>(conn)
                    .await
            }
        }
    };
}

label_queries!(tag_queries, tags, recipe_tags, tag_id, NewTagRow);
label_queries!(
    ingredient_queries,
    ingredients,
    recipe_ingredients,
    ingredient_id,
    NewIngredientRow
);

#[async_trait]
impl LabelRepository for DieselLabelRepository {
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        filter: LabelFilter,
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let rows = match kind {
            LabelKind::Tag => tag_queries::list(&mut conn, owner, filter.assigned_only).await,
            LabelKind::Ingredient => {
                ingredient_queries::list(&mut conn, owner, filter.assigned_only).await
            }
        }
        .map_err(map_diesel_error)?;
        let mut labels = decode_labels(rows)?;
        sort_for_listing(&mut labels);
        Ok(labels)
    }

    async fn insert(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let row = match kind {
            LabelKind::Tag => tag_queries::insert(&mut conn, owner, name.as_ref()).await,
            LabelKind::Ingredient => {
                ingredient_queries::insert(&mut conn, owner, name.as_ref()).await
            }
        }
        .map_err(map_diesel_error)?;
        row_to_label(row).map_err(LabelRepositoryError::query)
    }

    async fn find(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let row = match kind {
            LabelKind::Tag => tag_queries::find(&mut conn, owner, id.get()).await,
            LabelKind::Ingredient => ingredient_queries::find(&mut conn, owner, id.get()).await,
        }
        .map_err(map_diesel_error)?;
        row.map(|row| row_to_label(row).map_err(LabelRepositoryError::query))
            .transpose()
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let row = match kind {
            LabelKind::Tag => tag_queries::rename(&mut conn, owner, id.get(), name.as_ref()).await,
            LabelKind::Ingredient => {
                ingredient_queries::rename(&mut conn, owner, id.get(), name.as_ref()).await
            }
        }
        .map_err(map_diesel_error)?;
        row.map(|row| row_to_label(row).map_err(LabelRepositoryError::query))
            .transpose()
    }

    async fn find_owned(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<LabelId>, LabelRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found = match kind {
            LabelKind::Tag => tag_queries::find_owned(&mut conn, owner, raw).await,
            LabelKind::Ingredient => ingredient_queries::find_owned(&mut conn, owner, raw).await,
        }
        .map_err(map_diesel_error)?;
        Ok(found.into_iter().map(LabelId::new).collect())
    }
}
