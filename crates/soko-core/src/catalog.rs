//! Canonical catalog of product definitions.

use crate::ids::CatalogItemId;
use crate::{round2, unix_timestamp};
use serde::{Deserialize, Serialize};

/// A canonical product definition shared by listings across vendors.
///
/// `sku` and `barcode` are unique when present; the price aggregates are
/// recomputed from all linked active+approved listings whenever one is
/// created, updated, or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub alternate_names: Vec<String>,

    // Aggregates over linked listings
    pub total_listings: i64,
    pub lowest_price: f64,
    pub highest_price: f64,
    pub average_price: f64,

    pub is_active: bool,
    pub created_at: i64,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: CatalogItemId::generate(),
            name: name.into(),
            description: None,
            sku: None,
            barcode: None,
            brand: None,
            category: category.into(),
            subcategory: None,
            tags: Vec::new(),
            images: Vec::new(),
            alternate_names: Vec::new(),
            total_listings: 0,
            lowest_price: 0.0,
            highest_price: 0.0,
            average_price: 0.0,
            is_active: true,
            created_at: unix_timestamp(),
        }
    }

    /// Recompute the price aggregates from the given listing prices.
    ///
    /// An empty slice zeroes everything out (no linked listings left).
    pub fn apply_price_stats(&mut self, prices: &[f64]) {
        if prices.is_empty() {
            self.total_listings = 0;
            self.lowest_price = 0.0;
            self.highest_price = 0.0;
            self.average_price = 0.0;
            return;
        }

        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &p in prices {
            lowest = lowest.min(p);
            highest = highest.max(p);
            sum += p;
        }

        self.total_listings = prices.len() as i64;
        self.lowest_price = lowest;
        self.highest_price = highest;
        self.average_price = round2(sum / prices.len() as f64);
    }
}
