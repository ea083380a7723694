//! Recipe domain service.
//!
//! Validates label references against the caller's own tags and
//! ingredients before handing complete drafts to the recipe repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::label_service::map_label_error;
use crate::domain::ports::{
    LabelRepository, RecipeCommand, RecipeQuery, RecipeRepository, RecipeRepositoryError,
};
use crate::domain::{
    Error, LabelKind, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId,
    RecipeValidationError, UpdateMode, UserId,
};

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

/// Recipe service implementing the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, L> {
    recipe_repo: Arc<R>,
    label_repo: Arc<L>,
}

impl<R, L> RecipeService<R, L> {
    /// Create a new service over the recipe and label repositories.
    pub fn new(recipe_repo: Arc<R>, label_repo: Arc<L>) -> Self {
        Self {
            recipe_repo,
            label_repo,
        }
    }
}

impl<R, L> RecipeService<R, L>
where
    R: RecipeRepository,
    L: LabelRepository,
{
    async fn ensure_labels_owned(&self, owner: &UserId, draft: &RecipeDraft) -> Result<(), Error> {
        for kind in [LabelKind::Tag, LabelKind::Ingredient] {
            let wanted = draft.label_ids(kind);
            if wanted.is_empty() {
                continue;
            }
            let owned = self
                .label_repo
                .find_owned(owner, kind, wanted)
                .await
                .map_err(map_label_error)?;
            if let Some(id) = wanted.iter().find(|id| !owned.contains(id)) {
                debug!(%owner, %kind, %id, "recipe references a label the caller does not own");
                return Err(RecipeValidationError::UnknownLabel { kind, id: *id }.into());
            }
        }
        Ok(())
    }

    async fn load(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipe_repo
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }
}

#[async_trait]
impl<R, L> RecipeQuery for RecipeService<R, L>
where
    R: RecipeRepository,
    L: LabelRepository,
{
    async fn list_recipes(
        &self,
        owner: &UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, Error> {
        self.recipe_repo
            .list(owner, &filter)
            .await
            .map_err(map_recipe_error)
    }

    async fn get_recipe(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.load(owner, id).await
    }
}

#[async_trait]
impl<R, L> RecipeCommand for RecipeService<R, L>
where
    R: RecipeRepository,
    L: LabelRepository,
{
    async fn create_recipe(
        &self,
        owner: &UserId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        let draft = changes.into_new_draft()?;
        self.ensure_labels_owned(owner, &draft).await?;
        self.recipe_repo
            .insert(owner, &draft)
            .await
            .map_err(map_recipe_error)
    }

    async fn update_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
        mode: UpdateMode,
    ) -> Result<Recipe, Error> {
        let existing = self.load(owner, id).await?;
        let draft = changes.resolve(&existing, mode)?;
        self.ensure_labels_owned(owner, &draft).await?;
        self.recipe_repo
            .update(owner, id, &draft)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn delete_recipe(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let removed = self
            .recipe_repo
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?;
        if removed {
            Ok(())
        } else {
            Err(recipe_not_found(id))
        }
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
