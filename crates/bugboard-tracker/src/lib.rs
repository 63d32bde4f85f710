//! Bug tracking records for bugboard: bugs, the comments attached to them,
//! request validation, and storage backends.
//!
//! The [`BugStore`] trait is the only way records are read or written.
//! [`MemoryStore`] keeps everything in process; [`SqliteStore`] (default
//! `sqlite` feature) persists to a relational database and enforces the
//! comment→bug foreign key with cascading deletes.

mod bug;
mod comment;
mod error;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;
pub mod validation;

pub use bug::{Bug, BugPatch, BugStatus, NewBug};
pub use comment::{Comment, NewComment};
pub use error::TrackerError;
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::BugStore;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
