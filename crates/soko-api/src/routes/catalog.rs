//! Catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use soko_core::catalog::CatalogItem;
use soko_core::ids::CatalogItemId;
use soko_directory::catalog::{CatalogFilter, NewCatalogItem};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub items: Vec<CatalogItem>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewCatalogItem>,
) -> Result<Json<CatalogItem>, ApiError> {
    let item = state.directory.catalog_service.create(body).await?;
    Ok(Json(item))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Json<CatalogListResponse> {
    let page = state.directory.catalog_service.list(&filter).await;
    Json(CatalogListResponse {
        items: page.items,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    })
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CatalogItem>, ApiError> {
    let item = state
        .directory
        .catalog_service
        .get(&CatalogItemId::new(id))
        .await?;
    Ok(Json(item))
}

#[derive(Debug, Serialize)]
pub struct TermCount {
    pub name: String,
    pub count: i64,
}

pub async fn categories(State(state): State<AppState>) -> Json<Vec<TermCount>> {
    let categories = state.directory.catalog_service.categories().await;
    Json(
        categories
            .into_iter()
            .map(|(name, count)| TermCount { name, count })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct BrandsParams {
    pub category: Option<String>,
}

pub async fn brands(
    State(state): State<AppState>,
    Query(params): Query<BrandsParams>,
) -> Json<Vec<TermCount>> {
    let brands = state
        .directory
        .catalog_service
        .brands(params.category.as_deref())
        .await;
    Json(
        brands
            .into_iter()
            .map(|(name, count)| TermCount { name, count })
            .collect(),
    )
}
