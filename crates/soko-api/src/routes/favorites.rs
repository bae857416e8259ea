//! Favorites endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use soko_core::favorite::{Favorite, FavoriteTarget};
use soko_core::ids::{FavoriteId, ProductId, VendorId};

use crate::error::ApiError;
use crate::state::{caller, AppState};

#[derive(Debug, Deserialize)]
pub struct NewFavoriteBody {
    /// "product" or "vendor".
    pub target_type: String,
    pub target_id: String,
}

pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewFavoriteBody>,
) -> Result<Json<Favorite>, ApiError> {
    let user_id = caller(&headers)?;
    let target = match body.target_type.as_str() {
        "product" => FavoriteTarget::Product(ProductId::new(&body.target_id)),
        "vendor" => FavoriteTarget::Vendor(VendorId::new(&body.target_id)),
        other => {
            return Err(ApiError::bad_request(format!(
                "invalid favorite target type: {other}"
            )))
        }
    };
    let favorite = state.directory.favorite_service.add(&user_id, target).await?;
    Ok(Json(favorite))
}

#[derive(Debug, Deserialize)]
pub struct FavoriteListParams {
    /// Narrow to "product" or "vendor".
    pub target_type: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FavoriteListParams>,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    let user_id = caller(&headers)?;
    let favorites = state
        .directory
        .favorite_service
        .list(&user_id, params.target_type.as_deref())
        .await;
    Ok(Json(favorites))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = caller(&headers)?;
    state
        .directory
        .favorite_service
        .remove(&FavoriteId::new(id), &user_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
