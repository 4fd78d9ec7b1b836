//! Core-error to HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use bloggle_shared::CoreError;
use serde::Serialize;

/// JSON error body returned on every failure path.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub code: u16,
}

/// HTTP-facing error. Domain errors keep their message; internal failures
/// are logged and reported generically.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 403 for non-admin callers hitting the administrative overlay.
    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Access denied. Admin privileges required.".to_string(),
        }
    }

    /// 401 with a generic message.
    pub fn unauthorized(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        }
    }

    /// 400 with field-level detail.
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let (status, message) = match &err {
            CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CoreError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CoreError::Privacy(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            CoreError::Database(_) | CoreError::Io(_) | CoreError::Document(_) | CoreError::Hash(_) => {
                tracing::error!(error = %err, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}
