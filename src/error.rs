use thiserror::Error;

use crate::todo::TodoId;

/// Failures at the construction boundary (seeds and snapshots).
///
/// Mutations on a live [`TodoStore`](crate::TodoStore) never fail.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate todo id {0}")]
    DuplicateId(TodoId),

    #[error("Todo {0} has an empty label")]
    EmptyLabel(TodoId),

    #[error("Editing marker names unknown todo {0}")]
    UnknownEditingId(TodoId),
}

pub type Result<T> = std::result::Result<T, StoreError>;
