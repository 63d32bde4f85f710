//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs via `tracing-subscriber`
//! - **Request Tracing**: request id propagation across every handler
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use bugboard_node::observability::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Pretty);
//!
//! let app: Router<()> = Router::new().layer(axum::middleware::from_fn(request_id_middleware));
//! ```

mod logging;
pub mod middleware;

pub use logging::{default_directives, init_logging, LogFormat};
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
