use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use watchlist_models::ItemId;
use watchlist_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Item not found")]
    NotFound,

    #[error("Item {0} is already in the list")]
    Conflict(ItemId),

    #[error("Database not configured. Set server.database_url or WATCHLIST_DATABASE_URL")]
    NotConfigured,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Conflict(id) => ApiError::Conflict(id),
            StoreError::NotConfigured(message) => {
                tracing::warn!("List backend unavailable: {}", message);
                ApiError::NotConfigured
            }
            other => {
                tracing::error!("List backend error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
