//! Error types for tracker operations.

use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur while reading or mutating bugs and comments.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Bug not found.
    #[error("bug not found: {id}")]
    BugNotFound { id: u64 },

    /// Comment not found (or not owned by the addressed bug).
    #[error("comment not found: {id}")]
    CommentNotFound { id: u64 },

    /// Input failed validation. Nothing was written.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// The relational backend failed.
    #[cfg(feature = "sqlite")]
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl TrackerError {
    /// Returns true if the error means the addressed record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::BugNotFound { .. } | TrackerError::CommentNotFound { .. }
        )
    }
}
