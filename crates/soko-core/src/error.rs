//! Marketplace error types.

use thiserror::Error;

/// Errors that can occur in marketplace operations.
#[derive(Error, Debug)]
pub enum SokoError {
    /// State not found.
    #[error("State not found: {0}")]
    StateNotFound(String),

    /// Area not found.
    #[error("Area not found: {0}")]
    AreaNotFound(String),

    /// Market not found.
    #[error("Market not found: {0}")]
    MarketNotFound(String),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog item not found.
    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(String),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Review not found.
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// Favorite not found.
    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    /// Invalid product status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Location hierarchy mismatch.
    #[error("Location hierarchy mismatch: {0}")]
    LocationMismatch(String),

    /// Caller does not own the entity it is mutating.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input rejected before query construction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error.
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SokoError {
    fn from(e: serde_json::Error) -> Self {
        SokoError::Serialization(e.to_string())
    }
}
