//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    auth_tokens, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changeset for profile updates; a `None` hash leaves the password alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: &'a str,
    pub password_hash: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Token models
// ---------------------------------------------------------------------------

/// Insertable struct for the per-user token digest.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub user_id: Uuid,
    pub digest: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Label models
// ---------------------------------------------------------------------------

/// Positional row shared by the `tags` and `ingredients` tables.
///
/// Select `(id, user_id, name)` explicitly when loading it.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct LabelRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for new tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Insertable struct for new ingredients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: Option<String>,
}

/// Insertable struct for creating recipes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: Option<&'a str>,
}

/// Changeset overwriting every scalar column; `None` clears the link.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: Option<&'a str>,
}

/// Recipe to tag link.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

/// Recipe to ingredient link.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
}
