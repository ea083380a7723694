//! Driving port for listing and fetching tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Error, Label, LabelFilter, LabelId, LabelKind, UserId};

/// Domain use-case port for reading labels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelQuery: Send + Sync {
    /// List the owner's labels of `kind`.
    async fn list_labels(
        &self,
        owner: &UserId,
        kind: LabelKind,
        filter: LabelFilter,
    ) -> Result<Vec<Label>, Error>;

    /// Fetch one of the owner's labels of `kind`.
    ///
    /// Labels owned by someone else are reported as not found.
    async fn get_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<Label, Error>;
}
