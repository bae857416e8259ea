//! Store error types.

use thiserror::Error;

/// Errors from the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document with this ID already exists.
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    /// No document with this ID.
    #[error("Document not found: {0}")]
    NotFound(String),
}
