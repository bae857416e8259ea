//! Search filter specifications.
//!
//! Filters are explicit, immutable structs validated once at the boundary
//! and passed through the pipelines untouched — there is no generic
//! key-value match bag anywhere in the engine.

use serde::{Deserialize, Serialize};
use soko_core::prelude::*;
use soko_core::GeoPoint;

/// Which surfaces a unified search should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Products,
    Shops,
    #[default]
    All,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Products => "products",
            SearchKind::Shops => "shops",
            SearchKind::All => "all",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "products" => Some(SearchKind::Products),
            "shops" => Some(SearchKind::Shops),
            "all" => Some(SearchKind::All),
            _ => None,
        }
    }
}

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Distance first on geo searches, then views, then newest.
    #[default]
    Relevance,
    /// Price, low to high.
    PriceLow,
    /// Price, high to low.
    PriceHigh,
    /// Vendor rating, high to low.
    Rating,
    /// Newest first.
    Newest,
    /// Distance ascending; falls back to newest without a geo point.
    Distance,
    /// View count, high to low.
    Popularity,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Rating => "rating",
            SortBy::Newest => "newest",
            SortBy::Distance => "distance",
            SortBy::Popularity => "popularity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relevance" => Some(SortBy::Relevance),
            "price_low" => Some(SortBy::PriceLow),
            "price_high" => Some(SortBy::PriceHigh),
            "rating" => Some(SortBy::Rating),
            "newest" => Some(SortBy::Newest),
            "distance" => Some(SortBy::Distance),
            "popularity" => Some(SortBy::Popularity),
            _ => None,
        }
    }
}

/// Default proximity radius in kilometers.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;
/// Default page size.
pub const DEFAULT_LIMIT: i64 = 20;
/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 100;

/// The filter set shared by product search, comparison, and facets.
///
/// Everything is optional; an empty filter matches all active, approved
/// products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Free-text query, matched case-insensitively as a substring.
    pub query: Option<String>,

    // Location filters
    pub state_id: Option<StateId>,
    pub area_id: Option<AreaId>,
    pub market_id: Option<MarketId>,

    // Geolocation
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Proximity radius in kilometers.
    pub max_distance_km: f64,

    // Category filters
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,

    // Price filters
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,

    // Other filters
    pub in_stock: Option<bool>,
    pub verified_only: bool,
    pub tags: Vec<String>,
    /// Explicit status override; absent means only approved listings.
    pub status: Option<ProductStatus>,

    // Sorting and pagination
    pub sort_by: SortBy,
    pub page: i64,
    pub limit: i64,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            query: None,
            state_id: None,
            area_id: None,
            market_id: None,
            longitude: None,
            latitude: None,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            category: None,
            subcategory: None,
            brand: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            verified_only: false,
            tags: Vec::new(),
            status: None,
            sort_by: SortBy::Relevance,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query (empty strings are treated as no query).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        if !query.is_empty() {
            self.query = Some(query);
        }
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_state(mut self, state_id: StateId) -> Self {
        self.state_id = Some(state_id);
        self
    }

    pub fn with_area(mut self, area_id: AreaId) -> Self {
        self.area_id = Some(area_id);
        self
    }

    pub fn with_market(mut self, market_id: MarketId) -> Self {
        self.market_id = Some(market_id);
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_geo(mut self, longitude: f64, latitude: f64, max_distance_km: f64) -> Self {
        self.longitude = Some(longitude);
        self.latitude = Some(latitude);
        self.max_distance_km = max_distance_km;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set pagination, clamping into the allowed range.
    pub fn with_pagination(mut self, page: i64, limit: i64) -> Self {
        self.page = page.max(1);
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// The geo center, when both coordinates were supplied.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
            _ => None,
        }
    }

    /// Proximity radius in meters.
    pub fn max_distance_m(&self) -> f64 {
        self.max_distance_km * 1000.0
    }

    /// Offset of the first item on the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Reject malformed input before any query construction.
    pub fn validate(&self) -> Result<(), SokoError> {
        if self.longitude.is_some() != self.latitude.is_some() {
            return Err(SokoError::Validation(
                "longitude and latitude must be supplied together".into(),
            ));
        }
        if let Some(lng) = self.longitude {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(SokoError::Validation(format!("invalid longitude: {lng}")));
            }
        }
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(SokoError::Validation(format!("invalid latitude: {lat}")));
            }
        }
        if self.max_distance_km <= 0.0 || !self.max_distance_km.is_finite() {
            return Err(SokoError::Validation(format!(
                "invalid max distance: {}",
                self.max_distance_km
            )));
        }
        if let Some(min) = self.min_price {
            if min < 0.0 || !min.is_finite() {
                return Err(SokoError::Validation(format!("invalid min price: {min}")));
            }
        }
        if let Some(max) = self.max_price {
            if max < 0.0 || !max.is_finite() {
                return Err(SokoError::Validation(format!("invalid max price: {max}")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(SokoError::Validation(format!(
                    "min price {min} exceeds max price {max}"
                )));
            }
        }
        if self.page < 1 {
            return Err(SokoError::Validation(format!("invalid page: {}", self.page)));
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(SokoError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Shop search filter: the shared filter plus vendor-only criteria.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopFilter {
    pub search: SearchFilter,
    pub vendor_type: Option<VendorType>,
    pub is_open: Option<bool>,
}

impl ShopFilter {
    pub fn new(search: SearchFilter) -> Self {
        Self {
            search,
            vendor_type: None,
            is_open: None,
        }
    }

    pub fn with_vendor_type(mut self, vendor_type: VendorType) -> Self {
        self.vendor_type = Some(vendor_type);
        self
    }

    pub fn validate(&self) -> Result<(), SokoError> {
        self.search.validate()
    }
}

impl From<SearchFilter> for ShopFilter {
    fn from(search: SearchFilter) -> Self {
        Self::new(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_valid() {
        assert!(SearchFilter::new().validate().is_ok());
    }

    #[test]
    fn test_pagination_clamped() {
        let f = SearchFilter::new().with_pagination(0, 1000);
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, MAX_LIMIT);
        assert_eq!(f.offset(), 0);
    }

    #[test]
    fn test_half_geo_pair_rejected() {
        let mut f = SearchFilter::new();
        f.longitude = Some(3.38);
        assert!(f.validate().is_err());
        f.latitude = Some(6.52);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let f = SearchFilter::new().with_price_range(Some(500.0), Some(100.0));
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let f = SearchFilter::new().with_price_range(Some(-1.0), None);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_geo_point_requires_both() {
        let mut f = SearchFilter::new();
        assert!(f.geo_point().is_none());
        f.longitude = Some(3.38);
        assert!(f.geo_point().is_none());
        f.latitude = Some(6.52);
        let p = f.geo_point().unwrap();
        assert_eq!(p.longitude, 3.38);
    }

    #[test]
    fn test_empty_query_ignored() {
        let f = SearchFilter::new().with_query("");
        assert!(f.query.is_none());
    }

    #[test]
    fn test_sort_by_round_trip() {
        assert_eq!(SortBy::from_str("price_low"), Some(SortBy::PriceLow));
        assert_eq!(SortBy::from_str("POPULARITY"), Some(SortBy::Popularity));
        assert_eq!(SortBy::from_str("bogus"), None);
    }

    #[test]
    fn test_search_kind_round_trip() {
        assert_eq!(SearchKind::from_str("shops"), Some(SearchKind::Shops));
        assert_eq!(SearchKind::All.as_str(), "all");
    }
}
