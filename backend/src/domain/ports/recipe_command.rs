//! Driving port for recipe mutations.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeChanges, RecipeId, UpdateMode, UserId};

/// Domain use-case port for creating, updating and deleting recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe. Title, time and price must be supplied.
    async fn create_recipe(&self, owner: &UserId, changes: RecipeChanges)
    -> Result<Recipe, Error>;

    /// Update an owned recipe.
    async fn update_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
        mode: UpdateMode,
    ) -> Result<Recipe, Error>;

    /// Delete an owned recipe.
    async fn delete_recipe(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;
}
