//! Shared harness for the node end-to-end tests.
//!
//! Every scenario runs once per storage backend so both stores are held to
//! the same HTTP behavior.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use bugboard_node::api::{create_router, AppState};
use bugboard_tracker::{BugStore, MemoryStore, SqliteStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// One fresh store per backend.
pub fn backends() -> Vec<Arc<dyn BugStore>> {
    let memory: Arc<dyn BugStore> = Arc::new(MemoryStore::new());
    let sqlite: Arc<dyn BugStore> = Arc::new(SqliteStore::open_memory().unwrap());
    vec![memory, sqlite]
}

/// A router together with direct access to its store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn BugStore>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body as JSON, or `Null` when the body is empty.
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    /// Sorted field names from a validation error body.
    pub fn failed_fields(&self) -> Vec<String> {
        let json = self.json();
        assert_eq!(json["error"], "validation_error", "body: {json}");
        let mut fields: Vec<String> = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        fields.dedup();
        fields
    }
}

impl TestApp {
    pub fn new(store: Arc<dyn BugStore>) -> Self {
        Self {
            router: create_router(AppState::new(store.clone())),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request("DELETE", uri, None).await
    }

    /// Creates a bug and returns its JSON representation.
    pub async fn create_bug(&self, body: Value) -> Value {
        let response = self.post("/bugs/", body).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }

    /// Creates a comment under `bug_id` and returns its JSON representation.
    pub async fn create_comment(&self, bug_id: u64, body: Value) -> Value {
        let response = self.post(&format!("/bugs/{bug_id}/comments/"), body).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }
}

/// Builds one app per backend.
pub fn apps() -> Vec<TestApp> {
    backends().into_iter().map(TestApp::new).collect()
}

/// Reads the numeric `id` from an entity body.
pub fn id_of(entity: &Value) -> u64 {
    entity["id"].as_u64().unwrap()
}
