//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeFilter, RecipeId, UserId};

/// Domain use-case port for recipe listings and lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// List the owner's recipes that pass `filter`.
    async fn list_recipes(&self, owner: &UserId, filter: RecipeFilter)
    -> Result<Vec<Recipe>, Error>;

    /// Fetch one owned recipe.
    async fn get_recipe(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error>;
}
