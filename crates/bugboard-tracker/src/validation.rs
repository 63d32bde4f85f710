//! Request validation for bug and comment operations.
//!
//! Every write endpoint has an input shape here. Inputs are deserialized
//! leniently (all fields optional, unknown fields ignored) and then turned
//! into a domain command, collecting every field problem into one
//! [`ValidationErrors`] so a client sees all of them at once.
//!
//! ```rust
//! use bugboard_tracker::validation::{validate_status, CreateBugInput};
//! use bugboard_tracker::BugStatus;
//!
//! assert_eq!(validate_status("resolved").unwrap(), BugStatus::Resolved);
//! assert!(validate_status("RESOLVED").is_err());
//!
//! let input: CreateBugInput =
//!     serde_json::from_str(r#"{"title": "Crash", "description": "On boot"}"#).unwrap();
//! let new_bug = input.into_new_bug().unwrap();
//! assert_eq!(new_bug.status, BugStatus::Unresolved);
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{BugPatch, BugStatus, NewBug, NewComment, Result};

const INVALID_STATUS_MESSAGE: &str = "Invalid value for status parameter.";

/// Checks a raw status value against the allowed set.
///
/// Only the exact lowercase wire values are accepted.
pub fn validate_status(value: &str) -> std::result::Result<BugStatus, ValidationError> {
    match value {
        "resolved" => Ok(BugStatus::Resolved),
        "unresolved" => Ok(BugStatus::Unresolved),
        _ => {
            let mut err = ValidationError::new("invalid_choice");
            err.message = Some(INVALID_STATUS_MESSAGE.into());
            err.add_param("value".into(), &value);
            Err(err)
        }
    }
}

/// Parses the `status` query parameter of the bug listing.
///
/// A missing or empty parameter means "no filter".
pub fn parse_status_filter(value: Option<&str>) -> Result<Option<BugStatus>> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => {
            let mut errors = ValidationErrors::new();
            match validate_status(raw) {
                Ok(status) => Ok(Some(status)),
                Err(err) => {
                    errors.add("status", err);
                    Err(errors.into())
                }
            }
        }
    }
}

/// Deserializes a JSON request body. An empty body reads as `{}`.
pub fn parse_input<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| {
        let mut err = ValidationError::new("parse");
        err.message = Some(format!("Malformed JSON body: {e}").into());
        let mut errors = ValidationErrors::new();
        errors.add("payload", err);
        errors.into()
    })
}

/// Body of `POST /bugs/`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateBugInput {
    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[validate(length(
        max = 10,
        message = "Assignee id must be at most 10 characters."
    ))]
    pub assignee_id: Option<String>,
}

impl CreateBugInput {
    /// Validates the input into a creation command.
    pub fn into_new_bug(self) -> Result<NewBug> {
        let mut errors = field_errors(&self);

        let status = check_status(&mut errors, self.status.as_deref());
        check_blank(&mut errors, "assignee_id", self.assignee_id.as_deref());
        let title = require(&mut errors, "title", self.title);
        let description = require(&mut errors, "description", self.description);

        match (title, description) {
            (Some(title), Some(description)) if errors.is_empty() => Ok(NewBug {
                title,
                description,
                status: status.unwrap_or_default(),
                assignee_id: self.assignee_id,
            }),
            _ => Err(errors.into()),
        }
    }
}

/// Body of `PATCH /bugs/{id}/`. Every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBugInput {
    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[validate(length(
        max = 10,
        message = "Assignee id must be at most 10 characters."
    ))]
    pub assignee_id: Option<String>,
}

impl UpdateBugInput {
    /// Validates the input into a merge-patch.
    pub fn into_patch(self) -> Result<BugPatch> {
        let mut errors = field_errors(&self);
        let status = check_status(&mut errors, self.status.as_deref());
        check_blank(&mut errors, "title", self.title.as_deref());
        check_blank(&mut errors, "description", self.description.as_deref());
        check_blank(&mut errors, "assignee_id", self.assignee_id.as_deref());

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(BugPatch {
            title: self.title,
            description: self.description,
            status,
            assignee_id: self.assignee_id,
        })
    }
}

/// Body of `PATCH /bugs/{id}/assign/`. Other fields are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssignBugInput {
    #[validate(length(
        max = 10,
        message = "Assignee id must be at most 10 characters."
    ))]
    pub assignee_id: Option<String>,
}

impl AssignBugInput {
    pub fn into_patch(self) -> Result<BugPatch> {
        let mut errors = field_errors(&self);
        check_blank(&mut errors, "assignee_id", self.assignee_id.as_deref());

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(BugPatch {
            assignee_id: self.assignee_id,
            ..BugPatch::default()
        })
    }
}

/// Body of `PATCH /bugs/{id}/resolve/`. Other fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveBugInput {
    pub status: Option<String>,
}

impl ResolveBugInput {
    pub fn into_patch(self) -> Result<BugPatch> {
        let mut errors = ValidationErrors::new();
        let status = check_status(&mut errors, self.status.as_deref());

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(BugPatch {
            status,
            ..BugPatch::default()
        })
    }
}

/// Body of `POST /bugs/{id}/comments/`.
///
/// `bug` is accepted so clients echoing a full comment do not fail, but it is
/// discarded: the owning bug always comes from the path.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: Option<String>,
    pub body: Option<String>,
    pub bug: Option<serde_json::Value>,
}

impl CreateCommentInput {
    pub fn into_new_comment(self) -> Result<NewComment> {
        let mut errors = field_errors(&self);

        let title = require(&mut errors, "title", self.title);
        let body = require(&mut errors, "body", self.body);

        match (title, body) {
            (Some(title), Some(body)) if errors.is_empty() => Ok(NewComment { title, body }),
            _ => Err(errors.into()),
        }
    }
}

fn field_errors(input: &impl Validate) -> ValidationErrors {
    match input.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    }
}

fn require(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    match value.as_deref() {
        None => {
            let mut err = ValidationError::new("required");
            err.message = Some("This field is required.".into());
            errors.add(field, err);
        }
        Some(text) => check_blank(errors, field, Some(text)),
    }
    value
}

/// Rejects present values that are empty once surrounding whitespace is
/// ignored. The stored value is never trimmed.
fn check_blank(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if value.is_some_and(|text| text.trim().is_empty()) {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        errors.add(field, err);
    }
}

fn check_status(errors: &mut ValidationErrors, value: Option<&str>) -> Option<BugStatus> {
    let raw = value?;
    match validate_status(raw) {
        Ok(status) => Some(status),
        Err(err) => {
            errors.add("status", err);
            None
        }
    }
}
