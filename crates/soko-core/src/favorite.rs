//! Saved vendors and products.

use crate::ids::{FavoriteId, ProductId, UserId, VendorId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

/// What a favorite points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteTarget {
    Product(ProductId),
    Vendor(VendorId),
}

impl FavoriteTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteTarget::Product(_) => "product",
            FavoriteTarget::Vendor(_) => "vendor",
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            FavoriteTarget::Product(id) => id.as_str(),
            FavoriteTarget::Vendor(id) => id.as_str(),
        }
    }
}

/// A saved item. Unique per (user, target).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub target: FavoriteTarget,
    pub created_at: i64,
}

impl Favorite {
    pub fn new(user_id: UserId, target: FavoriteTarget) -> Self {
        Self {
            id: FavoriteId::generate(),
            user_id,
            target,
            created_at: unix_timestamp(),
        }
    }
}
