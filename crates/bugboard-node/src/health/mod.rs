//! # Health Check Module
//!
//! `GET /health` reports the node version, uptime and whether the bug store
//! answers a trivial query. Returns 200 when the store is reachable and 503
//! otherwise, so it can back both liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bugboard_tracker::BugStore;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::api::AppState;

/// Health status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is healthy.
    Up,
    /// Component is unhealthy.
    Down,
}

/// Individual component health.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    /// Component status.
    pub status: HealthStatus,
    /// Optional latency in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    /// Create a healthy component with latency.
    pub fn up_with_latency(latency: Duration) -> Self {
        Self {
            status: HealthStatus::Up,
            latency_ms: Some(latency.as_millis() as u64),
            details: None,
        }
    }

    /// Create an unhealthy component with reason.
    pub fn down_with_reason(reason: &str) -> Self {
        Self {
            status: HealthStatus::Down,
            latency_ms: None,
            details: Some(serde_json::json!({ "reason": reason })),
        }
    }
}

/// Component checks.
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    /// Bug store health.
    pub storage: ComponentHealth,
}

/// Overall health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Version info.
    pub version: String,
    /// Storage backend in use.
    pub backend: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Component checks.
    pub checks: HealthChecks,
}

/// Creates the health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let storage = match state.store.count_bugs() {
        Ok(_) => ComponentHealth::up_with_latency(start.elapsed()),
        Err(e) => {
            tracing::warn!(error = %e, "Bug store health check failed");
            ComponentHealth::down_with_reason(&e.to_string())
        }
    };

    let status = storage.status;
    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.store.backend().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        checks: HealthChecks { storage },
    };

    let code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(response)).into_response()
}
