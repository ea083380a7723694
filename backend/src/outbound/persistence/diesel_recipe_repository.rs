//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipes are loaded with one query for the rows and one per label table
//! for the attached tags and ingredients. Writes replace the link rows
//! inside the same transaction as the recipe row.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    CookingTime, Label, Price, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeLink,
    RecipeTitle, UserId,
};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::diesel_label_repository::row_to_label;
use super::models::{
    LabelRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, RecipeUpdate,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_pool_error_with(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_diesel_error_with(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn raw_ids<T: Copy>(ids: &[T], get: impl Fn(T) -> i64) -> Vec<i64> {
    ids.iter().copied().map(get).collect()
}

/// Labels attached to a batch of recipes, keyed by recipe id.
#[derive(Default)]
struct AttachedLabels {
    tags: HashMap<i64, Vec<Label>>,
    ingredients: HashMap<i64, Vec<Label>>,
}

fn group_labels(
    rows: Vec<(i64, LabelRow)>,
) -> Result<HashMap<i64, Vec<Label>>, RecipeRepositoryError> {
    let mut grouped: HashMap<i64, Vec<Label>> = HashMap::new();
    for (recipe_id, row) in rows {
        let label = row_to_label(row).map_err(RecipeRepositoryError::query)?;
        grouped.entry(recipe_id).or_default().push(label);
    }
    Ok(grouped)
}

async fn load_attached_labels(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> Result<AttachedLabels, RecipeRepositoryError> {
    if recipe_ids.is_empty() {
        return Ok(AttachedLabels::default());
    }

    let tag_rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::id.asc())
        .select((recipe_tags::recipe_id, (tags::id, tags::user_id, tags::name)))
        .load::<(i64, LabelRow)>(conn)
        .await
        .map_err(map_diesel_error)?;

    let ingredient_rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            (ingredients::id, ingredients::user_id, ingredients::name),
        ))
        .load::<(i64, LabelRow)>(conn)
        .await
        .map_err(map_diesel_error)?;

    Ok(AttachedLabels {
        tags: group_labels(tag_rows)?,
        ingredients: group_labels(ingredient_rows)?,
    })
}

fn row_to_recipe(
    row: RecipeRow,
    attached: &mut AttachedLabels,
) -> Result<Recipe, RecipeRepositoryError> {
    let invalid = |err: &dyn std::fmt::Display| {
        RecipeRepositoryError::query(format!("stored recipe {} is invalid: {err}", row.id))
    };
    let title = RecipeTitle::new(&row.title).map_err(|err| invalid(&err))?;
    let time_minutes =
        CookingTime::new(i64::from(row.time_minutes)).map_err(|err| invalid(&err))?;
    let price = Price::from_cents(row.price_cents).map_err(|err| invalid(&err))?;
    let link = match row.link.as_deref() {
        Some(raw) => RecipeLink::parse(raw).map_err(|err| invalid(&err))?,
        None => None,
    };

    Ok(Recipe {
        id: RecipeId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        title,
        time_minutes,
        price,
        link,
        tags: attached.tags.remove(&row.id).unwrap_or_default(),
        ingredients: attached.ingredients.remove(&row.id).unwrap_or_default(),
    })
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut attached = load_attached_labels(conn, &ids).await?;
    rows.into_iter()
        .map(|row| row_to_recipe(row, &mut attached))
        .collect()
}

async fn find_row(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    id: i64,
) -> QueryResult<Option<RecipeRow>> {
    recipes::table
        .filter(recipes::user_id.eq(owner))
        .filter(recipes::id.eq(id))
        .select(RecipeRow::as_select())
        .first::<RecipeRow>(conn)
        .await
        .optional()
}

/// Replace the recipe's link rows with those named by `draft`.
async fn replace_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;

    let tag_rows: Vec<RecipeTagRow> = raw_ids(&draft.tags, |id| id.get())
        .into_iter()
        .map(|tag_id| RecipeTagRow { recipe_id, tag_id })
        .collect();
    if !tag_rows.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .execute(conn)
            .await?;
    }

    let ingredient_rows: Vec<RecipeIngredientRow> = raw_ids(&draft.ingredients, |id| id.get())
        .into_iter()
        .map(|ingredient_id| RecipeIngredientRow {
            recipe_id,
            ingredient_id,
        })
        .collect();
    if !ingredient_rows.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredient_rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

impl DieselRecipeRepository {
    async fn load_one(
        conn: &mut AsyncPgConnection,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let Some(row) = find_row(conn, owner, id).await.map_err(map_diesel_error)? else {
            return Ok(None);
        };
        Ok(hydrate(conn, vec![row]).await?.pop())
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = recipes::table
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .order(recipes::id.desc())
            .select(RecipeRow::as_select())
            .into_boxed();
        if let Some(tag_ids) = filter.tags.as_deref().filter(|ids| !ids.is_empty()) {
            let tagged = recipe_tags::table
                .filter(recipe_tags::tag_id.eq_any(raw_ids(tag_ids, |id| id.get())))
                .select(recipe_tags::recipe_id);
            query = query.filter(recipes::id.eq_any(tagged));
        }
        if let Some(ingredient_ids) = filter.ingredients.as_deref().filter(|ids| !ids.is_empty()) {
            let containing = recipe_ingredients::table
                .filter(
                    recipe_ingredients::ingredient_id.eq_any(raw_ids(ingredient_ids, |id| id.get())),
                )
                .select(recipe_ingredients::recipe_id);
            query = query.filter(recipes::id.eq_any(containing));
        }

        let rows = query
            .load::<RecipeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Self::load_one(&mut conn, *owner.as_uuid(), id.get()).await
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let row = NewRecipeRow {
            user_id: owner,
            title: draft.title.as_ref(),
            time_minutes: draft.time_minutes.minutes(),
            price_cents: draft.price.cents(),
            link: draft.link.as_ref().map(AsRef::<str>::as_ref),
        };

        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    replace_links(conn, id, draft).await?;
                    Ok::<_, diesel::result::Error>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Self::load_one(&mut conn, owner, id)
            .await?
            .ok_or_else(|| RecipeRepositoryError::query("inserted recipe vanished"))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let raw_id = id.get();
        let changes = RecipeUpdate {
            title: draft.title.as_ref(),
            time_minutes: draft.time_minutes.minutes(),
            price_cents: draft.price.cents(),
            link: draft.link.as_ref().map(AsRef::<str>::as_ref),
        };

        let updated = conn
            .transaction(|conn| {
                async move {
                    let touched = diesel::update(
                        recipes::table
                            .filter(recipes::user_id.eq(owner))
                            .filter(recipes::id.eq(raw_id)),
                    )
                    .set(&changes)
                    .execute(conn)
                    .await?;
                    if touched == 0 {
                        return Ok(false);
                    }
                    replace_links(conn, raw_id, draft).await?;
                    Ok::<_, diesel::result::Error>(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if !updated {
            return Ok(None);
        }
        Self::load_one(&mut conn, owner, raw_id).await
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            recipes::table
                .filter(recipes::user_id.eq(owner.as_uuid()))
                .filter(recipes::id.eq(id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
