//! Error-to-response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use soko_core::SokoError;

/// An API error: a domain error mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<SokoError> for ApiError {
    fn from(err: SokoError) -> Self {
        let status = match &err {
            SokoError::StateNotFound(_)
            | SokoError::AreaNotFound(_)
            | SokoError::MarketNotFound(_)
            | SokoError::VendorNotFound(_)
            | SokoError::ProductNotFound(_)
            | SokoError::CatalogItemNotFound(_)
            | SokoError::UserNotFound(_)
            | SokoError::ReviewNotFound(_)
            | SokoError::FavoriteNotFound(_) => StatusCode::NOT_FOUND,
            SokoError::Validation(_)
            | SokoError::InvalidStatusTransition { .. }
            | SokoError::LocationMismatch(_) => StatusCode::BAD_REQUEST,
            SokoError::Forbidden(_) => StatusCode::FORBIDDEN,
            SokoError::Conflict(_) => StatusCode::CONFLICT,
            SokoError::Store(_) | SokoError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16(),
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(SokoError::ProductNotFound("p-1".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::from(SokoError::Validation("bad".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = ApiError::from(SokoError::Forbidden("no".into()));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::from(SokoError::Conflict("dup".into()));
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
