//! Bug records and status handling.

use serde::{Deserialize, Serialize};

/// Resolution status of a bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BugStatus {
    /// The bug has been fixed or otherwise dealt with.
    Resolved,
    /// The bug is still outstanding.
    #[default]
    Unresolved,
}

impl BugStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Resolved => "resolved",
            BugStatus::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for BugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    /// Identifier assigned by the store.
    pub id: u64,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Current status.
    pub status: BugStatus,
    /// Identifier of the external user the bug is assigned to.
    pub assignee_id: Option<String>,
}

impl Bug {
    /// Builds a stored bug from a validated creation request.
    pub fn from_new(id: u64, new: NewBug) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            assignee_id: new.assignee_id,
        }
    }

    /// Returns true if the bug is resolved.
    pub fn is_resolved(&self) -> bool {
        self.status == BugStatus::Resolved
    }

    /// Overlays the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: BugPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = Some(assignee_id);
        }
    }
}

/// A validated request to create a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub assignee_id: Option<String>,
}

impl NewBug {
    /// Creates an unresolved, unassigned bug request.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: BugStatus::default(),
            assignee_id: None,
        }
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: BugStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial assignee.
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }
}

/// A validated merge-patch for a bug. `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<BugStatus>,
    pub assignee_id: Option<String>,
}

impl BugPatch {
    /// A patch that only sets the status.
    pub fn status(status: BugStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A patch that only sets the assignee.
    pub fn assignee(assignee_id: impl Into<String>) -> Self {
        Self {
            assignee_id: Some(assignee_id.into()),
            ..Self::default()
        }
    }

    /// Returns true if applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}
