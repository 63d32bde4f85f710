//! # Validation Responses
//!
//! Field rules live in [`bugboard_tracker::validation`]. This module turns
//! the resulting [`ValidationErrors`] into the HTTP 400 body and caps request
//! body size before any handler reads it.
//!
//! ```json
//! {
//!   "error": "validation_error",
//!   "message": "Validation failed",
//!   "details": [
//!     { "field": "status", "code": "invalid_choice",
//!       "message": "Invalid value for status parameter." }
//!   ]
//! }
//! ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Validation error response.
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    /// Error type.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level error details.
    pub details: Vec<FieldError>,
}

/// Field-level validation error.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Validation failed for field '{field}'")),
                })
            })
            .collect();
        // field_errors() is a HashMap; keep client output stable.
        details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        ValidationErrorResponse {
            error: "validation_error".to_string(),
            message: "Validation failed".to_string(),
            details,
        }
    }
}

/// Rejects requests whose declared body exceeds [`MAX_BODY_SIZE`].
pub async fn body_size_limit_middleware(
    request: Request,
    next: axum::middleware::Next,
) -> Response {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if declared.is_some_and(|len| len > MAX_BODY_SIZE) {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({
                "error": "payload_too_large",
                "message": "Request body exceeds maximum size",
            })),
        )
            .into_response();
    }

    next.run(request).await
}
