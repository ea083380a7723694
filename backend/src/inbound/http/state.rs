//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, LabelCommand, LabelQuery, RecipeCommand, RecipeQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// Built once at startup by the server wiring, or by
/// `test_support::InMemoryStore::http_state` in tests.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, token issue and profile updates.
    pub accounts: Arc<dyn AccountCommand>,
    /// Token authentication and profile reads.
    pub accounts_query: Arc<dyn AccountQuery>,
    /// Tag and ingredient creation.
    pub labels: Arc<dyn LabelCommand>,
    /// Tag and ingredient listings.
    pub labels_query: Arc<dyn LabelQuery>,
    /// Recipe mutations.
    pub recipes: Arc<dyn RecipeCommand>,
    /// Recipe reads.
    pub recipes_query: Arc<dyn RecipeQuery>,
}
