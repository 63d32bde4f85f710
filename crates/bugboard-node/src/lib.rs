//! # Bugboard Node
//!
//! HTTP node for the bugboard tracker: a JSON REST API over bugs and the
//! comments attached to them, backed by an in-memory or SQLite store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Bugboard Node                │
//! ├──────────────────────────────────────────────┤
//! │  request id span → TraceLayer → body limit   │
//! │                      │                       │
//! │   /bugs/... (bug_api)      /health (health)  │
//! │                      │                       │
//! │        Arc<dyn BugStore> (bugboard-tracker)  │
//! │         MemoryStore  |  SqliteStore          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin bugboard-node -- --api-addr 127.0.0.1:8080 --database bugs.db
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Router assembly, shared state, error mapping
//! - [`bug_api`] - Bug and comment endpoints
//! - [`config`] - Layered node configuration
//! - [`health`] - Health probe
//! - [`observability`] - Structured logging and request tracing
//! - [`validation`] - Validation error bodies and request size limits
//!
//! ## Example: Building the Router
//!
//! ```rust
//! use std::sync::Arc;
//! use bugboard_tracker::MemoryStore;
//! use bugboard_node::api::{create_router, AppState};
//!
//! let state = AppState::new(Arc::new(MemoryStore::new()));
//! let app = create_router(state);
//! ```

pub mod api;
pub mod bug_api;
pub mod config;
pub mod health;
pub mod observability;
pub mod validation;
