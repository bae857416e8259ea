//! Vendor endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use soko_core::ids::VendorId;
use soko_core::vendor::Vendor;
use soko_core::GeoPoint;
use soko_directory::vendors::{NewVendor, VendorUpdate};

use crate::error::ApiError;
use crate::state::{caller, AppState};

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewVendor>,
) -> Result<Json<Vendor>, ApiError> {
    let user_id = caller(&headers)?;
    let vendor = state.directory.vendor_service.register(&user_id, body).await?;
    Ok(Json(vendor))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, ApiError> {
    let vendor = state.directory.vendor_service.get(&VendorId::new(id)).await?;
    Ok(Json(vendor))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vendor>, ApiError> {
    let user_id = caller(&headers)?;
    let vendor = state.directory.vendor_service.find_by_user(&user_id).await?;
    Ok(Json(vendor))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub longitude: f64,
    pub latitude: f64,
    pub max_distance: Option<f64>,
}

pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Json<Vec<Vendor>> {
    let center = GeoPoint::new(params.longitude, params.latitude);
    let vendors = state
        .directory
        .vendor_service
        .find_nearby(center, params.max_distance.unwrap_or(10.0))
        .await;
    Json(vendors)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<VendorUpdate>,
) -> Result<Json<Vendor>, ApiError> {
    let user_id = caller(&headers)?;
    let vendor = state
        .directory
        .vendor_service
        .update(&VendorId::new(id), &user_id, body)
        .await?;
    Ok(Json(vendor))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = caller(&headers)?;
    state
        .directory
        .vendor_service
        .delete(&VendorId::new(id), &user_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
