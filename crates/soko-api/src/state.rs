//! Shared application state.

use axum::http::HeaderMap;
use soko_core::ids::UserId;
use soko_directory::Directory;
use soko_search::SearchEngine;

use crate::error::ApiError;

/// Everything the handlers need: the directory services and the search
/// engine, all sharing the same collections.
#[derive(Clone)]
pub struct AppState {
    pub directory: Directory,
    pub engine: SearchEngine,
}

impl AppState {
    pub fn new() -> Self {
        let directory = Directory::new();
        let engine = SearchEngine::new(
            directory.products.clone(),
            directory.vendors.clone(),
            directory.states.clone(),
            directory.areas.clone(),
            directory.markets.clone(),
        );
        Self { directory, engine }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The authenticated caller's ID, delivered by the upstream auth layer as
/// an `x-user-id` header.
pub fn caller(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let value = headers
        .get("x-user-id")
        .ok_or_else(|| ApiError::unauthorized("missing x-user-id header"))?;
    let id = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("malformed x-user-id header"))?;
    if id.is_empty() {
        return Err(ApiError::unauthorized("empty x-user-id header"));
    }
    Ok(UserId::new(id))
}
