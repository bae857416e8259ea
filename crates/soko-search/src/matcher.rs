//! Storage-neutral match predicates.
//!
//! A matcher is compiled once from a filter and then applied to candidate
//! documents by the result-producing pipelines; it never executes a query
//! itself.

use crate::filter::{SearchFilter, ShopFilter};
use soko_core::prelude::*;

/// Case-insensitive substring containment.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Predicate over products, compiled from a [`SearchFilter`].
#[derive(Debug, Clone)]
pub struct ProductMatch {
    query: Option<String>,
    state_id: Option<StateId>,
    area_id: Option<AreaId>,
    market_id: Option<MarketId>,
    category: Option<String>,
    subcategory: Option<String>,
    brand: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    in_stock: Option<bool>,
    /// Listings must be in this status; `approved` unless the caller
    /// explicitly asked for another.
    status: ProductStatus,
}

impl ProductMatch {
    /// Compile the full predicate, location filters included.
    pub fn from_filter(filter: &SearchFilter) -> Self {
        Self {
            query: filter.query.as_ref().map(|q| q.to_lowercase()),
            state_id: filter.state_id.clone(),
            area_id: filter.area_id.clone(),
            market_id: filter.market_id.clone(),
            category: filter.category.clone(),
            subcategory: filter.subcategory.clone(),
            brand: filter.brand.as_ref().map(|b| b.to_lowercase()),
            min_price: filter.min_price,
            max_price: filter.max_price,
            in_stock: filter.in_stock,
            status: filter.status.unwrap_or(ProductStatus::Approved),
        }
    }

    /// Compile the facet base predicate: text query and category only.
    ///
    /// Location filters are deliberately left out so facet counts can show
    /// what other locations also have matches.
    pub fn without_location(filter: &SearchFilter) -> Self {
        Self {
            query: filter.query.as_ref().map(|q| q.to_lowercase()),
            state_id: None,
            area_id: None,
            market_id: None,
            category: filter.category.clone(),
            subcategory: None,
            brand: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            status: ProductStatus::Approved,
        }
    }

    /// Re-attach a location constraint (used when a facet dimension narrows
    /// by an already-chosen parent, e.g. areas within the chosen state).
    pub fn narrow_state(mut self, state_id: Option<StateId>) -> Self {
        self.state_id = state_id;
        self
    }

    pub fn narrow_area(mut self, area_id: Option<AreaId>) -> Self {
        self.area_id = area_id;
        self
    }

    /// Whether the product satisfies every compiled criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_active || product.status != self.status {
            return false;
        }

        if let Some(query) = &self.query {
            let text_hit = contains_ci(&product.name, query)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, query))
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|b| contains_ci(b, query))
                || product.tags.iter().any(|t| contains_ci(t, query));
            if !text_hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(subcategory) = &self.subcategory {
            if product.subcategory.as_ref() != Some(subcategory) {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if !product
                .brand
                .as_deref()
                .is_some_and(|b| contains_ci(b, brand))
            {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }

        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }

        if let Some(state_id) = &self.state_id {
            if product.state_id.as_ref() != Some(state_id) {
                return false;
            }
        }
        if let Some(area_id) = &self.area_id {
            if product.area_id.as_ref() != Some(area_id) {
                return false;
            }
        }
        if let Some(market_id) = &self.market_id {
            if product.market_id.as_ref() != Some(market_id) {
                return false;
            }
        }

        true
    }
}

/// Predicate over vendors, compiled from a [`ShopFilter`].
#[derive(Debug, Clone)]
pub struct VendorMatch {
    query: Option<String>,
    state_id: Option<StateId>,
    area_id: Option<AreaId>,
    market_id: Option<MarketId>,
    vendor_type: Option<VendorType>,
    verified_only: bool,
    is_open: Option<bool>,
    category: Option<String>,
}

impl VendorMatch {
    pub fn from_filter(filter: &ShopFilter) -> Self {
        Self {
            query: filter.search.query.as_ref().map(|q| q.to_lowercase()),
            state_id: filter.search.state_id.clone(),
            area_id: filter.search.area_id.clone(),
            market_id: filter.search.market_id.clone(),
            vendor_type: filter.vendor_type,
            verified_only: filter.search.verified_only,
            is_open: filter.is_open,
            category: filter.search.category.clone(),
        }
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        if !vendor.is_active {
            return false;
        }

        if let Some(query) = &self.query {
            let text_hit = contains_ci(&vendor.business_name, query)
                || vendor
                    .business_description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, query))
                || vendor.categories.iter().any(|c| contains_ci(c, query))
                || vendor.tags.iter().any(|t| contains_ci(t, query));
            if !text_hit {
                return false;
            }
        }

        if let Some(state_id) = &self.state_id {
            if &vendor.state_id != state_id {
                return false;
            }
        }
        if let Some(area_id) = &self.area_id {
            if &vendor.area_id != area_id {
                return false;
            }
        }
        if let Some(market_id) = &self.market_id {
            if vendor.market_id.as_ref() != Some(market_id) {
                return false;
            }
        }

        if let Some(vendor_type) = self.vendor_type {
            if vendor.vendor_type != vendor_type {
                return false;
            }
        }
        if self.verified_only && !vendor.is_verified {
            return false;
        }
        if let Some(is_open) = self.is_open {
            if vendor.is_open != is_open {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !vendor.categories.iter().any(|c| c == category) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SearchFilter;
    use soko_core::ids::VendorId;

    fn approved(name: &str, price: f64, category: &str) -> Product {
        let mut p = Product::new(VendorId::new("v-1"), name, price, category);
        p.status = ProductStatus::Approved;
        p
    }

    #[test]
    fn test_empty_filter_matches_approved_only() {
        let m = ProductMatch::from_filter(&SearchFilter::new());
        let mut p = approved("Rice", 100.0, "Groceries");
        assert!(m.matches(&p));
        p.status = ProductStatus::Pending;
        assert!(!m.matches(&p));
        p.status = ProductStatus::Approved;
        p.is_active = false;
        assert!(!m.matches(&p));
    }

    #[test]
    fn test_text_query_is_case_insensitive_substring() {
        let m = ProductMatch::from_filter(&SearchFilter::new().with_query("iphone"));
        let p = approved("iPhone 15 Pro Max", 950_000.0, "Electronics");
        assert!(m.matches(&p));

        let mut other = approved("Samsung S24", 780_000.0, "Electronics");
        assert!(!m.matches(&other));
        other.tags = vec!["iPhone alternative".into()];
        assert!(m.matches(&other));
    }

    #[test]
    fn test_query_matches_brand_and_description() {
        let m = ProductMatch::from_filter(&SearchFilter::new().with_query("apple"));
        let mut p = approved("Smartphone 15", 950_000.0, "Electronics");
        assert!(!m.matches(&p));
        p.brand = Some("Apple".into());
        assert!(m.matches(&p));
        p.brand = None;
        p.description = Some("Latest Apple flagship".into());
        assert!(m.matches(&p));
    }

    #[test]
    fn test_price_range_inclusive() {
        let m = ProductMatch::from_filter(
            &SearchFilter::new().with_price_range(Some(100.0), Some(200.0)),
        );
        assert!(m.matches(&approved("A", 100.0, "c")));
        assert!(m.matches(&approved("B", 200.0, "c")));
        assert!(!m.matches(&approved("C", 99.99, "c")));
        assert!(!m.matches(&approved("D", 200.01, "c")));
    }

    #[test]
    fn test_location_filter_requires_snapshot() {
        let state = StateId::new("st-lagos");
        let m = ProductMatch::from_filter(&SearchFilter::new().with_state(state.clone()));
        let mut p = approved("Rice", 100.0, "Groceries");
        // No snapshot on the product: the filter cannot match it.
        assert!(!m.matches(&p));
        p.state_id = Some(state);
        assert!(m.matches(&p));
    }

    #[test]
    fn test_without_location_drops_location_only() {
        let filter = SearchFilter::new()
            .with_query("rice")
            .with_category("Groceries")
            .with_state(StateId::new("st-lagos"));
        let m = ProductMatch::without_location(&filter);
        let p = approved("Ofada Rice", 80_000.0, "Groceries");
        // Matches despite no state snapshot: location was dropped.
        assert!(m.matches(&p));
        let other = approved("Ofada Rice", 80_000.0, "Fashion");
        assert!(!m.matches(&other));
    }

    #[test]
    fn test_explicit_status_override() {
        let mut filter = SearchFilter::new();
        filter.status = Some(ProductStatus::Pending);
        let m = ProductMatch::from_filter(&filter);
        let p = Product::new(VendorId::new("v-1"), "Rice", 100.0, "Groceries");
        assert!(m.matches(&p));
    }

    fn shop_filter() -> ShopFilter {
        ShopFilter::new(SearchFilter::new())
    }

    fn sample_vendor() -> Vendor {
        Vendor::new(
            UserId::generate(),
            "Kola Phones",
            VendorType::MarketShop,
            StateId::new("st-1"),
            AreaId::new("ar-1"),
            ContactDetails::with_phone("+2348011111111"),
        )
    }

    #[test]
    fn test_vendor_match_inactive_excluded() {
        let m = VendorMatch::from_filter(&shop_filter());
        let mut v = sample_vendor();
        assert!(m.matches(&v));
        v.is_active = false;
        assert!(!m.matches(&v));
    }

    #[test]
    fn test_vendor_match_query_over_name_and_categories() {
        let mut f = shop_filter();
        f.search = f.search.with_query("phones");
        let m = VendorMatch::from_filter(&f);
        let mut v = sample_vendor();
        assert!(m.matches(&v));

        v.business_name = "Ada Stores".into();
        assert!(!m.matches(&v));
        v.categories = vec!["Phones & Tablets".into()];
        assert!(m.matches(&v));
    }

    #[test]
    fn test_vendor_match_type_and_open() {
        let mut f = shop_filter();
        f.vendor_type = Some(VendorType::MallShop);
        f.is_open = Some(true);
        let m = VendorMatch::from_filter(&f);
        let mut v = sample_vendor();
        assert!(!m.matches(&v));
        v.vendor_type = VendorType::MallShop;
        assert!(m.matches(&v));
        v.is_open = false;
        assert!(!m.matches(&v));
    }
}
