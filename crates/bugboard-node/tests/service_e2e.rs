//! End-to-end tests for the cross-cutting HTTP behavior: health, request ids
//! and body limits.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use bugboard_node::observability::REQUEST_ID_HEADER;
use bugboard_node::validation::MAX_BODY_SIZE;
use bugboard_tracker::BugStore;
use common::apps;

#[tokio::test]
async fn test_health_reports_backend() {
    for app in apps() {
        let response = app.get("/health").await;
        assert_eq!(response.status, StatusCode::OK);

        let body = response.json();
        assert_eq!(body["status"], "up");
        assert_eq!(body["backend"], app.store.backend());
        assert_eq!(body["checks"]["storage"]["status"], "up");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}

#[tokio::test]
async fn test_request_id_generated() {
    for app in apps() {
        let response = app.get("/bugs/").await;
        let id = response
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}

#[tokio::test]
async fn test_request_id_propagated() {
    for app in apps() {
        let request = Request::builder()
            .uri("/bugs/404/")
            .header(REQUEST_ID_HEADER, "trace-me-123")
            .body(Body::empty())
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.headers[REQUEST_ID_HEADER], "trace-me-123");
    }
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    for app in apps() {
        let size = MAX_BODY_SIZE + 1;
        let request = Request::builder()
            .method("POST")
            .uri("/bugs/")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from(vec![b' '; size]))
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json()["error"], "payload_too_large");
        assert_eq!(app.store.count_bugs().unwrap(), 0);
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    for app in apps() {
        assert_eq!(app.get("/nope").await.status, StatusCode::NOT_FOUND);
    }
}
