//! Admin and moderation endpoints.
//!
//! Every handler requires an admin caller; the role check consults the user
//! directory via the `x-user-id` header the auth layer injects.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use soko_core::ids::{ProductId, UserId, VendorId};
use soko_core::product::Product;
use soko_core::user::User;
use soko_core::vendor::Vendor;
use soko_directory::products::ProductUpdate;

use crate::error::ApiError;
use crate::state::{caller, AppState};

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let user_id = caller(headers)?;
    state.directory.user_service.require_admin(&user_id).await?;
    Ok(())
}

pub async fn pending_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, ApiError> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.directory.admin.pending_products().await))
}

pub async fn approve_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Product>, ApiError> {
    require_admin(&state, &headers).await?;
    let product = state
        .directory
        .admin
        .approve_product(&ProductId::new(id))
        .await?;
    Ok(Json(product))
}

pub async fn reject_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Product>, ApiError> {
    require_admin(&state, &headers).await?;
    let product = state
        .directory
        .admin
        .reject_product(&ProductId::new(id))
        .await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    require_admin(&state, &headers).await?;
    let product = state
        .directory
        .product_service
        .admin_update(&ProductId::new(id), body)
        .await?;
    Ok(Json(product))
}

pub async fn verify_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vendor>, ApiError> {
    require_admin(&state, &headers).await?;
    let vendor = state
        .directory
        .admin
        .verify_vendor(&VendorId::new(id))
        .await?;
    Ok(Json(vendor))
}

#[derive(Debug, Deserialize)]
pub struct FeatureBody {
    #[serde(default = "default_featured")]
    pub featured: bool,
}

fn default_featured() -> bool {
    true
}

pub async fn feature_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<FeatureBody>,
) -> Result<Json<Vendor>, ApiError> {
    require_admin(&state, &headers).await?;
    let vendor = state
        .directory
        .admin
        .feature_vendor(&VendorId::new(id), body.featured)
        .await?;
    Ok(Json(vendor))
}

pub async fn deactivate_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vendor>, ApiError> {
    require_admin(&state, &headers).await?;
    let vendor = state
        .directory
        .admin
        .deactivate_vendor(&VendorId::new(id))
        .await?;
    Ok(Json(vendor))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    require_admin(&state, &headers).await?;
    let user = state
        .directory
        .admin
        .deactivate_user(&UserId::new(id))
        .await?;
    Ok(Json(user))
}
