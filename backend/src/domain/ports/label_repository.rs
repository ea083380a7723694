//! Port for tag and ingredient persistence.

use async_trait::async_trait;

use crate::domain::{Label, LabelFilter, LabelId, LabelKind, LabelName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by label repository adapters.
    pub enum LabelRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "label repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "label repository query failed: {message}",
    }
}

/// Port for owner-scoped tag and ingredient storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// List the owner's labels of `kind` in
    /// [`sort_for_listing`](crate::domain::sort_for_listing) order.
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        filter: LabelFilter,
    ) -> Result<Vec<Label>, LabelRepositoryError>;

    /// Create a label owned by `owner`.
    async fn insert(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelRepositoryError>;

    /// Fetch one of the owner's labels; `None` when missing or not owned.
    async fn find(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<Option<Label>, LabelRepositoryError>;

    /// Rename one of the owner's labels; `None` when missing or not owned.
    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError>;

    /// Return those of `ids` that exist and belong to `owner`.
    async fn find_owned(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<LabelId>, LabelRepositoryError>;
}
