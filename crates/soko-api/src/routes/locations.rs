//! Location hierarchy endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use soko_core::ids::{AreaId, MarketId, StateId};
use soko_core::location::{Area, Market, MarketType, State as LocationState};
use soko_core::GeoPoint;
use soko_directory::locations::NewMarket;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewStateBody {
    pub name: String,
    pub code: String,
}

pub async fn create_state(
    State(state): State<AppState>,
    Json(body): Json<NewStateBody>,
) -> Result<Json<LocationState>, ApiError> {
    let created = state
        .directory
        .locations
        .create_state(&body.name, &body.code)
        .await?;
    Ok(Json(created))
}

pub async fn list_states(
    State(state): State<AppState>,
) -> Json<Vec<LocationState>> {
    Json(state.directory.locations.list_states().await)
}

pub async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LocationState>, ApiError> {
    let found = state
        .directory
        .locations
        .get_state(&StateId::new(id))
        .await?;
    Ok(Json(found))
}

#[derive(Debug, Deserialize)]
pub struct NewAreaBody {
    pub name: String,
    pub state_id: StateId,
}

pub async fn create_area(
    State(state): State<AppState>,
    Json(body): Json<NewAreaBody>,
) -> Result<Json<Area>, ApiError> {
    let created = state
        .directory
        .locations
        .create_area(&body.name, &body.state_id)
        .await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct AreaListParams {
    pub state_id: Option<String>,
}

pub async fn list_areas(
    State(state): State<AppState>,
    Query(params): Query<AreaListParams>,
) -> Json<Vec<Area>> {
    let state_id = params.state_id.map(StateId::new);
    Json(state.directory.locations.list_areas(state_id.as_ref()).await)
}

pub async fn get_area(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Area>, ApiError> {
    let found = state.directory.locations.get_area(&AreaId::new(id)).await?;
    Ok(Json(found))
}

pub async fn create_market(
    State(state): State<AppState>,
    Json(body): Json<NewMarket>,
) -> Result<Json<Market>, ApiError> {
    let created = state.directory.locations.create_market(body).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct MarketListParams {
    pub state_id: Option<String>,
    pub area_id: Option<String>,
    pub market_type: Option<String>,
}

pub async fn list_markets(
    State(state): State<AppState>,
    Query(params): Query<MarketListParams>,
) -> Result<Json<Vec<Market>>, ApiError> {
    let market_type = match &params.market_type {
        None => None,
        Some(raw) => Some(MarketType::from_str(raw).ok_or_else(|| {
            ApiError::bad_request(format!("invalid market type: {raw}"))
        })?),
    };
    let state_id = params.state_id.map(StateId::new);
    let area_id = params.area_id.map(AreaId::new);
    let markets = state
        .directory
        .locations
        .list_markets(state_id.as_ref(), area_id.as_ref(), market_type)
        .await;
    Ok(Json(markets))
}

pub async fn get_market(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Market>, ApiError> {
    let found = state
        .directory
        .locations
        .get_market(&MarketId::new(id))
        .await?;
    Ok(Json(found))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub longitude: f64,
    pub latitude: f64,
    pub max_distance: Option<f64>,
}

pub async fn markets_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Json<Vec<Market>> {
    let center = GeoPoint::new(params.longitude, params.latitude);
    let markets = state
        .directory
        .locations
        .markets_nearby(center, params.max_distance.unwrap_or(10.0))
        .await;
    Json(markets)
}
