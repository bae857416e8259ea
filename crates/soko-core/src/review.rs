//! Shopper reviews of vendors and products.

use crate::ids::{ProductId, ReviewId, UserId, VendorId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

/// What a review is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTarget {
    Product(ProductId),
    Vendor(VendorId),
}

impl ReviewTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewTarget::Product(_) => "product",
            ReviewTarget::Vendor(_) => "vendor",
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            ReviewTarget::Product(id) => id.as_str(),
            ReviewTarget::Vendor(id) => id.as_str(),
        }
    }
}

/// One user's rating of one target. Unique per (user, target).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub target: ReviewTarget,
    /// 1 to 5 stars.
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub helpful_count: i64,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: i64,
}

impl Review {
    pub fn new(user_id: UserId, target: ReviewTarget, rating: u8) -> Self {
        Self {
            id: ReviewId::generate(),
            user_id,
            target,
            rating,
            title: None,
            comment: None,
            images: Vec::new(),
            helpful_count: 0,
            is_verified: true,
            is_active: true,
            created_at: unix_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_target() {
        let target = ReviewTarget::Vendor(VendorId::new("v-1"));
        assert_eq!(target.as_str(), "vendor");
        assert_eq!(target.id_str(), "v-1");
    }
}
