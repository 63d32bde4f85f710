//! HTTP API for the bugboard node.
//!
//! Wires the bug routes and the health probe into one router and maps
//! [`TrackerError`] onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use bugboard_tracker::{BugStore, TrackerError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::bug_api::bug_routes;
use crate::health::health_routes;
use crate::observability::request_id_middleware;
use crate::validation::{body_size_limit_middleware, ValidationErrorResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bug and comment store.
    pub store: Arc<dyn BugStore>,
    /// When the node started serving.
    pub started_at: Instant,
}

impl AppState {
    /// Creates state around the given store.
    pub fn new(store: Arc<dyn BugStore>) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub TrackerError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            TrackerError::BugNotFound { .. } | TrackerError::CommentNotFound { .. } => {
                StatusCode::NOT_FOUND.into_response()
            }
            TrackerError::Validation(errors) => {
                ValidationErrorResponse::from(errors).into_response()
            }
            TrackerError::Storage(e) => {
                tracing::error!(error = %e, "Bug store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: self.0.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(bug_routes())
        .layer(axum::middleware::from_fn(body_size_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
