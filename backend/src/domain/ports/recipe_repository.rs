//! Port for recipe persistence.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeDraft, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Port for owner-scoped recipe storage.
///
/// Every method is scoped by `owner`; records of other users behave as
/// missing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// List matching recipes, id descending, with labels loaded.
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Fetch one recipe.
    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Insert a recipe and its label links atomically.
    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite a recipe and its label links atomically.
    ///
    /// Returns `None` when no such recipe belongs to `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete a recipe. Returns whether a row was removed.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
