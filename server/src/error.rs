//! Mapping of service errors onto HTTP responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use faqbot_service::ServiceError;
use tracing::warn;

/// An error rendered as `{"detail": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    /// Map a failed upload, prefixing server-side failures like the other
    /// file-processing errors.
    pub fn upload(err: ServiceError) -> Self {
        if err.is_client_error() {
            Self::from(err)
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: format!("Error processing file: {err}"),
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!("Request failed: {}", self.detail);
        }
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}
