use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the relationship engines.
///
/// Validation errors are detected before any mutation; storage failures wrap
/// the backend error. Constraint races never surface here: the store
/// resolves them to idempotent create-or-get results.
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Cannot target yourself")]
    SelfTarget,

    #[error("Not a member or owner of this record")]
    Forbidden,

    #[error("Cannot mark your own message as read")]
    SelfRead,

    #[error("Interaction is blocked")]
    Blocked,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
