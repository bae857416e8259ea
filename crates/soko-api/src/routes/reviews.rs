//! Review endpoints.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use soko_core::ids::{ProductId, ReviewId, VendorId};
use soko_core::review::{Review, ReviewTarget};

use crate::error::ApiError;
use crate::state::{caller, AppState};

#[derive(Debug, Deserialize)]
pub struct NewReviewBody {
    /// "product" or "vendor".
    pub target_type: String,
    pub target_id: String,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
}

fn parse_review_target(target_type: &str, target_id: &str) -> Result<ReviewTarget, ApiError> {
    match target_type {
        "product" => Ok(ReviewTarget::Product(ProductId::new(target_id))),
        "vendor" => Ok(ReviewTarget::Vendor(VendorId::new(target_id))),
        other => Err(ApiError::bad_request(format!(
            "invalid review target type: {other}"
        ))),
    }
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewReviewBody>,
) -> Result<Json<Review>, ApiError> {
    let user_id = caller(&headers)?;
    let target = parse_review_target(&body.target_type, &body.target_id)?;
    let review = state
        .directory
        .review_service
        .create(&user_id, target, body.rating, body.title, body.comment)
        .await?;
    Ok(Json(review))
}

pub async fn list_for_target(
    State(state): State<AppState>,
    Path((target_type, id)): Path<(String, String)>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let target = parse_review_target(&target_type, &id)?;
    Ok(Json(state.directory.review_service.list_for_target(&target).await))
}

pub async fn mark_helpful(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .directory
        .review_service
        .mark_helpful(&ReviewId::new(id))
        .await?;
    Ok(Json(review))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = caller(&headers)?;
    state
        .directory
        .review_service
        .delete(&ReviewId::new(id), &user_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
