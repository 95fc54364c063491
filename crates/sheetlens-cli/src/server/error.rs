//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sheetlens::SheetlensError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Internal server error.
    Internal(String),
    /// Error from the sheetlens library.
    Sheetlens(SheetlensError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Sheetlens(e @ SheetlensError::UnknownField(_)) => {
                (StatusCode::BAD_REQUEST, "unknown_field", e.to_string())
            }
            ApiError::Sheetlens(e) => (StatusCode::BAD_REQUEST, "sheetlens_error", e.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<SheetlensError> for ApiError {
    fn from(err: SheetlensError) -> Self {
        ApiError::Sheetlens(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Sheetlens(e) => write!(f, "Sheetlens error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
