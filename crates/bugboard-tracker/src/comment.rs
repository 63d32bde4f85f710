//! Comments attached to bugs.

use serde::{Deserialize, Serialize};

/// A comment on a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier assigned by the store.
    pub id: u64,
    /// Short summary.
    pub title: String,
    /// Comment text.
    pub body: String,
    /// Id of the owning bug.
    pub bug: u64,
}

impl Comment {
    /// Builds a stored comment owned by `bug`.
    pub fn from_new(id: u64, bug: u64, new: NewComment) -> Self {
        Self {
            id,
            title: new.title,
            body: new.body,
            bug,
        }
    }

    /// Returns true if this comment belongs to the given bug.
    pub fn belongs_to(&self, bug: u64) -> bool {
        self.bug == bug
    }
}

/// A validated request to create a comment. The owning bug is supplied
/// separately by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub title: String,
    pub body: String,
}

impl NewComment {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
