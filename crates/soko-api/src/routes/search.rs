//! Search endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use soko_core::ids::{AreaId, MarketId, ProductId, StateId, VendorId};
use soko_core::prelude::{ProductStatus, VendorType};
use soko_search::{
    SearchFilter, SearchKind, ShopFilter, ShopProductsFilter, SortBy,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw query parameters of every search endpoint, validated once into a
/// [`SearchFilter`] before any pipeline runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub search_type: Option<String>,
    pub state_id: Option<String>,
    pub area_id: Option<String>,
    pub market_id: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub max_distance: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub verified_only: Option<bool>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    // Shop-only criteria
    pub vendor_type: Option<String>,
    pub is_open: Option<bool>,
}

impl SearchParams {
    pub fn filter(&self) -> Result<SearchFilter, ApiError> {
        let mut filter = SearchFilter::new();
        if let Some(query) = &self.query {
            filter = filter.with_query(query.clone());
        }
        filter.state_id = self.state_id.clone().map(StateId::new);
        filter.area_id = self.area_id.clone().map(AreaId::new);
        filter.market_id = self.market_id.clone().map(MarketId::new);
        filter.longitude = self.longitude;
        filter.latitude = self.latitude;
        if let Some(distance) = self.max_distance {
            filter.max_distance_km = distance;
        }
        filter.category = self.category.clone();
        filter.subcategory = self.subcategory.clone();
        filter.brand = self.brand.clone();
        filter.min_price = self.min_price;
        filter.max_price = self.max_price;
        filter.in_stock = self.in_stock;
        filter.verified_only = self.verified_only.unwrap_or(false);
        if let Some(status) = &self.status {
            filter.status = Some(
                ProductStatus::from_str(status)
                    .ok_or_else(|| ApiError::bad_request(format!("invalid status: {status}")))?,
            );
        }
        if let Some(sort_by) = &self.sort_by {
            filter.sort_by = SortBy::from_str(sort_by)
                .ok_or_else(|| ApiError::bad_request(format!("invalid sort key: {sort_by}")))?;
        }
        filter = filter.with_pagination(self.page.unwrap_or(1), self.limit.unwrap_or(20));

        filter.validate()?;
        Ok(filter)
    }

    pub fn shop_filter(&self) -> Result<ShopFilter, ApiError> {
        let mut shop = ShopFilter::new(self.filter()?);
        if let Some(vendor_type) = &self.vendor_type {
            shop.vendor_type = Some(VendorType::from_str(vendor_type).ok_or_else(|| {
                ApiError::bad_request(format!("invalid vendor type: {vendor_type}"))
            })?);
        }
        shop.is_open = self.is_open;
        Ok(shop)
    }

    pub fn kind(&self) -> Result<SearchKind, ApiError> {
        match &self.search_type {
            None => Ok(SearchKind::All),
            Some(raw) => SearchKind::from_str(raw)
                .ok_or_else(|| ApiError::bad_request(format!("invalid search type: {raw}"))),
        }
    }
}

pub async fn unified(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::SearchResponse>, ApiError> {
    let filter = params.filter()?;
    let kind = params.kind()?;
    Ok(Json(state.engine.search(&filter, kind).await))
}

pub async fn products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::Page<soko_search::ProductHit>>, ApiError> {
    let filter = params.filter()?;
    Ok(Json(state.engine.search_products(&filter).await))
}

pub async fn shops(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::Page<soko_search::ShopHit>>, ApiError> {
    let filter = params.shop_filter()?;
    Ok(Json(state.engine.search_shops(&filter).await))
}

pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::ComparisonResult>, ApiError> {
    let filter = params.filter()?;
    Ok(Json(state.engine.compare_products(&filter).await))
}

pub async fn filters(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::AvailableFilters>, ApiError> {
    let filter = params.filter()?;
    Ok(Json(state.engine.available_filters(&filter).await))
}

pub async fn product_vendors(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<soko_search::ComparisonGroup>, ApiError> {
    let filter = params.filter()?;
    let group = state
        .engine
        .product_vendors(&name, &filter)
        .await?
        .ok_or_else(|| ApiError::from(soko_core::SokoError::ProductNotFound(name)))?;
    Ok(Json(group))
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub limit: Option<usize>,
}

pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<Vec<soko_search::ProductHit>>, ApiError> {
    let hits = state
        .engine
        .similar_products(&ProductId::new(id), params.limit)
        .await?;
    Ok(Json(hits))
}

#[derive(Debug, Deserialize)]
pub struct ShopProductsParams {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn shop_products(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Query(params): Query<ShopProductsParams>,
) -> Result<Json<soko_search::results::ShopProductsResult>, ApiError> {
    let mut filter = ShopProductsFilter::new();
    filter.category = params.category;
    filter.min_price = params.min_price;
    filter.max_price = params.max_price;
    filter.page = params.page.unwrap_or(1);
    filter.limit = params.limit.unwrap_or(20);

    let result = state
        .engine
        .shop_products(&VendorId::new(vendor_id), &filter)
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_to_all_and_page_one() {
        let params = SearchParams::default();
        assert_eq!(params.kind().unwrap(), SearchKind::All);
        let filter = params.filter().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 20);
    }

    #[test]
    fn test_invalid_sort_key_rejected() {
        let mut params = SearchParams::default();
        params.sort_by = Some("cheapest".into());
        assert!(params.filter().is_err());
    }

    #[test]
    fn test_invalid_search_type_rejected() {
        let mut params = SearchParams::default();
        params.search_type = Some("everything".into());
        assert!(params.kind().is_err());
    }

    #[test]
    fn test_invalid_vendor_type_rejected() {
        let mut params = SearchParams::default();
        params.vendor_type = Some("warehouse".into());
        assert!(params.shop_filter().is_err());
    }

    #[test]
    fn test_half_geo_pair_rejected_at_boundary() {
        let mut params = SearchParams::default();
        params.longitude = Some(3.38);
        assert!(params.filter().is_err());
    }
}
