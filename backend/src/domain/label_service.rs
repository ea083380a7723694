//! Tag and ingredient domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{LabelCommand, LabelQuery, LabelRepository, LabelRepositoryError};
use crate::domain::{Error, Label, LabelFilter, LabelId, LabelKind, LabelName, UserId};

pub(crate) fn map_label_error(error: LabelRepositoryError) -> Error {
    match error {
        LabelRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("label repository unavailable: {message}"))
        }
        LabelRepositoryError::Query { message } => {
            Error::internal(format!("label repository error: {message}"))
        }
    }
}

fn label_not_found(kind: LabelKind, id: LabelId) -> Error {
    Error::not_found(format!("{kind} {id} not found"))
}

/// Label service implementing the label driving ports.
#[derive(Clone)]
pub struct LabelService<R> {
    label_repo: Arc<R>,
}

impl<R> LabelService<R> {
    /// Create a new service with the label repository.
    pub fn new(label_repo: Arc<R>) -> Self {
        Self { label_repo }
    }
}

#[async_trait]
impl<R> LabelQuery for LabelService<R>
where
    R: LabelRepository,
{
    async fn list_labels(
        &self,
        owner: &UserId,
        kind: LabelKind,
        filter: LabelFilter,
    ) -> Result<Vec<Label>, Error> {
        self.label_repo
            .list(owner, kind, filter)
            .await
            .map_err(map_label_error)
    }

    async fn get_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<Label, Error> {
        self.label_repo
            .find(owner, kind, id)
            .await
            .map_err(map_label_error)?
            .ok_or_else(|| label_not_found(kind, id))
    }
}

#[async_trait]
impl<R> LabelCommand for LabelService<R>
where
    R: LabelRepository,
{
    async fn create_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: LabelName,
    ) -> Result<Label, Error> {
        self.label_repo
            .insert(owner, kind, &name)
            .await
            .map_err(map_label_error)
    }

    async fn update_label(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: LabelName,
    ) -> Result<Label, Error> {
        self.label_repo
            .rename(owner, kind, id, &name)
            .await
            .map_err(map_label_error)?
            .ok_or_else(|| label_not_found(kind, id))
    }
}
