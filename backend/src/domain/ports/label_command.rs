//! Driving port for creating and renaming tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Error, Label, LabelId, LabelKind, LabelName, UserId};

/// Domain use-case port for label writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelCommand: Send + Sync {
    /// Create a label of `kind` owned by `owner`.
    async fn create_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: LabelName,
    ) -> Result<Label, Error>;

    /// Replace the name of one of the owner's labels.
    async fn update_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: LabelName,
    ) -> Result<Label, Error>;
}
