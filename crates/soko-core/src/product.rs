//! Product listings and their status lifecycle.

use crate::geo::GeoPoint;
use crate::ids::{AreaId, CatalogItemId, MarketId, ProductId, StateId, VendorId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

/// Moderation lifecycle of a listing.
///
/// draft → pending → approved | rejected → out_of_stock | discontinued.
/// Only `approved` listings are eligible for search by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Pending,
    Approved,
    Rejected,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Pending => "pending",
            ProductStatus::Approved => "approved",
            ProductStatus::Rejected => "rejected",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Discontinued => "discontinued",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "pending" => Some(ProductStatus::Pending),
            "approved" => Some(ProductStatus::Approved),
            "rejected" => Some(ProductStatus::Rejected),
            "out_of_stock" => Some(ProductStatus::OutOfStock),
            "discontinued" => Some(ProductStatus::Discontinued),
            _ => None,
        }
    }

    /// Whether moving to `next` is a legal lifecycle step.
    pub fn can_transition_to(&self, next: ProductStatus) -> bool {
        use ProductStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Rejected, Pending)
                | (Approved, OutOfStock)
                | (Approved, Discontinued)
                | (OutOfStock, Approved)
                | (OutOfStock, Discontinued)
        )
    }
}

/// What kind of offer the listing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Sale,
    Lease,
    Rent,
    Service,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Sale => "sale",
            ProductKind::Lease => "lease",
            ProductKind::Rent => "rent",
            ProductKind::Service => "service",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sale" => Some(ProductKind::Sale),
            "lease" => Some(ProductKind::Lease),
            "rent" => Some(ProductKind::Rent),
            "service" => Some(ProductKind::Service),
            _ => None,
        }
    }
}

/// A vendor's sellable item.
///
/// The `state_id`/`area_id`/`market_id`/`point` fields are a snapshot of the
/// owning vendor's location taken at creation time, not a live reference —
/// they are only re-copied by an explicit resync when the vendor moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub vendor_id: VendorId,
    /// Link to the master catalog, for price comparison.
    pub catalog_item_id: Option<CatalogItemId>,

    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub kind: ProductKind,

    pub price: f64,
    pub original_price: Option<f64>,
    pub currency: String,

    pub images: Vec<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,

    pub quantity: i64,
    pub unit: Option<String>,
    pub status: ProductStatus,

    pub views: i64,
    pub search_appearances: i64,
    pub is_active: bool,
    pub in_stock: bool,
    pub last_restocked: Option<i64>,

    // Denormalized location snapshot from the vendor
    pub state_id: Option<StateId>,
    pub area_id: Option<AreaId>,
    pub market_id: Option<MarketId>,
    pub point: Option<GeoPoint>,

    pub created_at: i64,
}

impl Product {
    pub fn new(
        vendor_id: VendorId,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::generate(),
            vendor_id,
            catalog_item_id: None,
            name: name.into(),
            description: None,
            sku: None,
            barcode: None,
            brand: None,
            kind: ProductKind::Sale,
            price,
            original_price: None,
            currency: "NGN".to_string(),
            images: Vec::new(),
            category: category.into(),
            subcategory: None,
            tags: Vec::new(),
            quantity: 0,
            unit: None,
            status: ProductStatus::Pending,
            views: 0,
            search_appearances: 0,
            is_active: true,
            in_stock: true,
            last_restocked: None,
            state_id: None,
            area_id: None,
            market_id: None,
            point: None,
            created_at: unix_timestamp(),
        }
    }

    /// Whether this listing is eligible for search surfaces.
    pub fn is_searchable(&self) -> bool {
        self.is_active && self.status == ProductStatus::Approved
    }

    /// SKU if present and non-empty.
    pub fn sku_key(&self) -> Option<&str> {
        self.sku.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults() {
        let p = Product::new(VendorId::new("v-1"), "Rice 50kg", 85_000.0, "Groceries");
        assert_eq!(p.status, ProductStatus::Pending);
        assert_eq!(p.currency, "NGN");
        assert!(!p.is_searchable());
    }

    #[test]
    fn test_searchable_requires_approved_and_active() {
        let mut p = Product::new(VendorId::new("v-1"), "Rice 50kg", 85_000.0, "Groceries");
        p.status = ProductStatus::Approved;
        assert!(p.is_searchable());
        p.is_active = false;
        assert!(!p.is_searchable());
    }

    #[test]
    fn test_status_transitions() {
        use ProductStatus::*;
        assert!(Draft.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(OutOfStock));
        assert!(OutOfStock.can_transition_to(Approved));
        assert!(!Draft.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Discontinued.can_transition_to(Approved));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            ProductStatus::from_str("out_of_stock"),
            Some(ProductStatus::OutOfStock)
        );
        assert_eq!(ProductStatus::from_str("unknown"), None);
        assert_eq!(ProductStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_sku_key_ignores_empty() {
        let mut p = Product::new(VendorId::new("v-1"), "Rice", 1.0, "Groceries");
        assert!(p.sku_key().is_none());
        p.sku = Some("".into());
        assert!(p.sku_key().is_none());
        p.sku = Some("SKU-1".into());
        assert_eq!(p.sku_key(), Some("SKU-1"));
    }
}
