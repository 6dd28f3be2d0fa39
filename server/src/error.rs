//! HTTP mapping for renewal failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use licensor_envelope::LicenseError;
use serde_json::json;

/// Server-side error wrapper that maps to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request body is not a renewal request: {0}")]
    BadRequest(#[from] serde_json::Error),
    #[error(transparent)]
    Issuance(#[from] LicenseError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid request body",
                    "detail": self.to_string(),
                }),
            ),
            // Issuance details stay in the server log.
            ApiError::Issuance(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "license issuance failed" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
