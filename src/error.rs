use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Non-finite distance or elevation at sample {index}")]
    NonFinite { index: usize },
    #[error("Distance decreases at sample {index} ({previous} m -> {current} m)")]
    NonMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("Duplicate distance {distance} m at sample {index}")]
    DuplicateDistance { index: usize, distance: f64 },
    #[error("Insufficient coordinates (need at least 2, got {0})")]
    CoordinatesTooShort(usize),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Detection setting {0} must be finite")]
    NonFinite(&'static str),
    #[error("Detection setting {0} must be positive")]
    NotPositive(&'static str),
    #[error("Detection setting {0} must not be negative")]
    Negative(&'static str),
    #[error("Smoothing window must be at least 1 sample")]
    ZeroWindow,
    #[error("Category thresholds must descend from HC to CAT3")]
    UnorderedCategories,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Profile not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Profile(_) | AppError::Config(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
