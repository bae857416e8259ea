//! Product listing endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use soko_core::ids::ProductId;
use soko_core::product::Product;
use soko_directory::products::{NewProduct, ProductListFilter, ProductUpdate};

use crate::error::ApiError;
use crate::state::{caller, AppState};

/// Directory listing response shape.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    let user_id = caller(&headers)?;
    let product = state
        .directory
        .product_service
        .create(&user_id, body)
        .await?;
    Ok(Json(product))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductListFilter>,
) -> Json<ProductListResponse> {
    let page = state.directory.product_service.list(&filter).await;
    Json(ProductListResponse {
        products: page.products,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    })
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .directory
        .product_service
        .get(&ProductId::new(id))
        .await?;
    Ok(Json(product))
}

pub async fn mine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, ApiError> {
    let user_id = caller(&headers)?;
    let vendor = state.directory.vendor_service.find_by_user(&user_id).await?;
    let products = state
        .directory
        .product_service
        .list_for_vendor(&vendor.id)
        .await;
    Ok(Json(products))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let user_id = caller(&headers)?;
    let product = state
        .directory
        .product_service
        .update(&ProductId::new(id), &user_id, body)
        .await?;
    Ok(Json(product))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = caller(&headers)?;
    state
        .directory
        .product_service
        .delete(&ProductId::new(id), &user_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
