//! # Bug API
//!
//! HTTP endpoints for bugs and the comments attached to them.
//!
//! ## Bug Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/bugs/` | List bugs, optionally `?status=resolved\|unresolved` |
//! | POST | `/bugs/` | Create a bug |
//! | GET | `/bugs/{id}/` | Get bug details |
//! | PATCH | `/bugs/{id}/` | Update any subset of the bug's fields |
//! | DELETE | `/bugs/{id}/` | Delete the bug and its comments |
//! | PATCH | `/bugs/{id}/assign/` | Set `assignee_id` only |
//! | PATCH | `/bugs/{id}/resolve/` | Set `status` only |
//!
//! ## Comment Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/bugs/{id}/comments/` | Add a comment to the bug |
//! | GET | `/bugs/{id}/comments/{comment_id}/` | Get a comment of the bug |
//! | DELETE | `/bugs/{id}/comments/{comment_id}/` | Delete a comment of the bug |
//!
//! A comment is only reachable under the bug it belongs to; addressing it
//! through any other bug id yields 404.
//!
//! ## Bug Status
//!
//! ```text
//! Unresolved <──> Resolved
//! ```
//!
//! New bugs start `unresolved` unless the request says otherwise.
//!
//! ## Example: Filing a Bug
//!
//! ```bash
//! curl -X POST http://localhost:8080/bugs/ \
//!   -H "Content-Type: application/json" \
//!   -d '{"title": "Login fails", "description": "500 on submit", "assignee_id": "42"}'
//! ```
//!
//! ## Errors
//!
//! - `404` with an empty body when the bug (or comment) does not exist. Item
//!   endpoints check this before looking at the request body.
//! - `400` with a `validation_error` body listing every failing field.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use bugboard_tracker::validation::{
    parse_input, parse_status_filter, AssignBugInput, CreateBugInput, CreateCommentInput,
    ResolveBugInput, UpdateBugInput,
};
use bugboard_tracker::{Bug, BugStore, Comment};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, AppState};

/// Creates the bug and comment routes.
pub fn bug_routes() -> Router<AppState> {
    Router::new()
        .route("/bugs/", get(list_bugs).post(create_bug))
        .route(
            "/bugs/{id}/",
            get(get_bug).patch(update_bug).delete(delete_bug),
        )
        .route("/bugs/{id}/assign/", patch(assign_bug))
        .route("/bugs/{id}/resolve/", patch(resolve_bug))
        .route("/bugs/{id}/comments/", post(create_comment))
        .route(
            "/bugs/{id}/comments/{comment_id}/",
            get(get_comment).delete(delete_comment),
        )
}

// ==================== Request/Response Types ====================

/// Query parameters for listing bugs.
#[derive(Debug, Deserialize)]
pub struct ListBugsQuery {
    pub status: Option<String>,
}

/// Bug response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BugResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub assignee_id: Option<String>,
}

impl From<Bug> for BugResponse {
    fn from(bug: Bug) -> Self {
        Self {
            id: bug.id,
            status: bug.status.as_str().to_string(),
            title: bug.title,
            description: bug.description,
            assignee_id: bug.assignee_id,
        }
    }
}

/// Comment response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub bug: u64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            title: comment.title,
            body: comment.body,
            bug: comment.bug,
        }
    }
}

// ==================== Bug Handlers ====================

/// Lists bugs in creation order.
async fn list_bugs(
    State(state): State<AppState>,
    Query(params): Query<ListBugsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = parse_status_filter(params.status.as_deref())?;

    let bugs = state.store.list_bugs(status)?;
    tracing::debug!(count = bugs.len(), filter = ?status, "Listed bugs");
    let responses: Vec<BugResponse> = bugs.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Creates a new bug.
async fn create_bug(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let new_bug = parse_input::<CreateBugInput>(&body)?.into_new_bug()?;

    let created = state.store.create_bug(new_bug)?;
    tracing::info!(bug_id = created.id, status = %created.status, "Created bug");

    Ok((StatusCode::CREATED, Json(BugResponse::from(created))))
}

/// Gets a specific bug.
async fn get_bug(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let bug = state.store.get_bug(id)?;
    Ok(Json(BugResponse::from(bug)))
}

/// Updates any subset of a bug's fields.
async fn update_bug(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    state.store.get_bug(id)?;
    let patch = parse_input::<UpdateBugInput>(&body)?.into_patch()?;

    let updated = state.store.update_bug(id, patch)?;
    tracing::info!(bug_id = id, "Updated bug");

    Ok(Json(BugResponse::from(updated)))
}

/// Deletes a bug together with its comments.
async fn delete_bug(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_bug(id)?;
    tracing::info!(bug_id = id, "Deleted bug");

    Ok(StatusCode::NO_CONTENT)
}

async fn assign_bug(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    state.store.get_bug(id)?;
    let patch = parse_input::<AssignBugInput>(&body)?.into_patch()?;

    let updated = state.store.update_bug(id, patch)?;
    tracing::info!(bug_id = id, assignee_id = ?updated.assignee_id, "Assigned bug");

    Ok(Json(BugResponse::from(updated)))
}

async fn resolve_bug(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    state.store.get_bug(id)?;
    let patch = parse_input::<ResolveBugInput>(&body)?.into_patch()?;

    let updated = state.store.update_bug(id, patch)?;
    tracing::info!(bug_id = id, status = %updated.status, "Changed bug status");

    Ok(Json(BugResponse::from(updated)))
}

// ==================== Comment Handlers ====================

/// Adds a comment to a bug. The owning bug always comes from the path.
async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let bug = state.store.get_bug(id)?;
    let new_comment = parse_input::<CreateCommentInput>(&body)?.into_new_comment()?;

    let created = state.store.create_comment(bug.id, new_comment)?;
    tracing::info!(bug_id = bug.id, comment_id = created.id, "Created comment");

    Ok((StatusCode::CREATED, Json(CommentResponse::from(created))))
}

async fn get_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(u64, u64)>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.store.get_comment(id, comment_id)?;
    Ok(Json(CommentResponse::from(comment)))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(u64, u64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_comment(id, comment_id)?;
    tracing::info!(bug_id = id, comment_id, "Deleted comment");

    Ok(StatusCode::NO_CONTENT)
}
