//! Search result and response shapes.

use serde::{Deserialize, Serialize};
use soko_core::prelude::*;
use soko_core::GeoPoint;

/// A paginated result set. `total` always counts the full filtered set,
/// not the returned slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Create a page from the already-sliced items and the full-set total.
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            total_pages,
        }
    }

    /// The degraded page an absorbed pipeline failure returns.
    pub fn empty(page: i64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// An id/name pair for a joined location node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// A joined market reference, with its kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketRef {
    pub id: String,
    pub name: String,
    pub market_type: MarketType,
}

/// Where a listing physically sits, for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListingLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketRef>,
    pub shop_number: Option<String>,
    pub shop_floor: Option<String>,
    pub shop_block: Option<String>,
    pub shop_address: Option<String>,
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<GeoPoint>,
}

/// The slice of a vendor embedded in a product hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSummary {
    pub id: VendorId,
    pub business_name: String,
    pub logo: Option<String>,
    pub rating: f64,
    pub is_verified: bool,
    pub phone: String,
    pub whatsapp: Option<String>,
}

impl VendorSummary {
    pub fn from_vendor(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id.clone(),
            business_name: vendor.business_name.clone(),
            logo: vendor.logo().map(str::to_string),
            rating: vendor.rating,
            is_verified: vendor.is_verified,
            phone: vendor.contact_details.phone.clone(),
            whatsapp: vendor.contact_details.whatsapp.clone(),
        }
    }
}

/// One product-at-a-vendor record in a product search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductHit {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub images: Vec<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub currency: String,
    pub in_stock: bool,
    /// Distance from the query point in kilometers; geo searches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub vendor: VendorSummary,
    pub location: ListingLocation,
}

/// Hours shown on a shop hit or vendor offer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopHours {
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub operating_days: Vec<String>,
    pub is_open: bool,
}

impl ShopHours {
    pub fn from_vendor(vendor: &Vendor) -> Self {
        let hours = vendor.operating_hours.clone().unwrap_or_default();
        Self {
            opening_time: hours.opening_time,
            closing_time: hours.closing_time,
            operating_days: hours.operating_days,
            is_open: vendor.is_open,
        }
    }
}

/// A shop's most-viewed product, shown as a preview on shop hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
}

/// Min/max product price of a shop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ShopPriceRange {
    pub min: f64,
    pub max: f64,
}

/// One vendor record in a shop search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopHit {
    pub id: VendorId,
    pub business_name: String,
    pub business_description: Option<String>,
    pub vendor_type: VendorType,
    pub logo: Option<String>,
    pub entrance_photo: Option<String>,
    pub layout_map: Option<String>,
    pub rating: f64,
    pub review_count: i64,
    pub total_products: i64,
    pub is_verified: bool,
    pub is_featured: bool,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub price_range: ShopPriceRange,
    pub contact_details: ContactDetails,
    pub bank_details: Option<BankDetails>,
    pub location: ListingLocation,
    pub operating_hours: ShopHours,
    pub featured_products: Vec<FeaturedProduct>,
}

/// Price spread of a comparison group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
    pub currency: String,
}

/// One vendor's offer inside a comparison group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorOffer {
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    pub business_name: String,
    pub logo: Option<String>,
    pub entrance_photo: Option<String>,
    pub rating: f64,
    pub is_verified: bool,
    pub price: f64,
    pub original_price: Option<f64>,
    pub in_stock: bool,
    pub quantity: i64,
    pub contact_details: ContactDetails,
    pub bank_details: Option<BankDetails>,
    pub location: ListingLocation,
    pub operating_hours: ShopHours,
}

/// Listings of the "same" product across vendors, bundled for comparison.
///
/// The grouping key is the SKU when present, else the lowercase name — a
/// heuristic join: two different goods sharing a free-text name will share
/// a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonGroup {
    /// The grouping key (SKU or lowercase name).
    pub id: String,
    pub catalog_item_id: Option<CatalogItemId>,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub images: Vec<String>,
    pub price_range: PriceRange,
    pub total_vendors: i64,
    /// Offers sorted by price ascending.
    pub vendors: Vec<VendorOffer>,
}

/// Comparison result: top groups by vendor count.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComparisonResult {
    pub items: Vec<ComparisonGroup>,
    pub total: i64,
}

/// A location facet bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationFacet {
    pub id: String,
    pub name: String,
    pub count: i64,
}

/// A term facet bucket (categories, brands).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermFacet {
    pub name: String,
    pub count: i64,
}

/// Overall price bounds of the matched set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

/// Count-per-value facets for the filter UI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AvailableFilters {
    pub states: Vec<LocationFacet>,
    pub areas: Vec<LocationFacet>,
    pub markets: Vec<LocationFacet>,
    pub categories: Vec<TermFacet>,
    pub brands: Vec<TermFacet>,
    pub price_range: PriceBounds,
}

/// Timing metadata attached to every unified search response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchMeta {
    /// RFC 3339 timestamp of when the search ran.
    pub timestamp: String,
    pub took_ms: u64,
}

/// The unified search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub search_type: crate::filter::SearchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Page<ProductHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Page<ShopHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_comparison: Option<ComparisonResult>,
    pub available_filters: AvailableFilters,
    pub meta: SearchMeta,
}

/// A shop header plus its paginated products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopProductsResult {
    pub shop: ShopHit,
    pub products: Page<ProductHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_total_pages() {
        let p: Page<i32> = Page::new(vec![1, 2, 3], 45, 2, 10);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_page_empty() {
        let p: Page<i32> = Page::empty(3);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
        assert!(p.is_empty());
    }

    #[test]
    fn test_page_exact_division() {
        let p: Page<i32> = Page::new(vec![], 40, 1, 10);
        assert_eq!(p.total_pages, 4);
    }
}
