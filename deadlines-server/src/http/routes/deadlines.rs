//! Deadline endpoints
//!
//! List endpoints take `?username=` and answer `{"entries": [...]}`.
//! Mutations take a JSON body and answer a JSON string message.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{DeadlineId, DeadlineList, DeadlineUpdate, NewDeadline};

const ADDED: &str = "Deadline added successfully";
const DELETED: &str = "Deadline deleted";
const UPDATED: &str = "Updated deadline";
const COMPLETED: &str = "Deadline marked as completed";
const INCOMPLETE: &str = "Deadline marked as incomplete";

const LIST_ALL_FAILED: &str = "Failed to retrieve deadlines";
const LIST_PAST_FAILED: &str = "Failed to retrieve past deadlines";
const LIST_CURRENT_FAILED: &str = "Failed to retrieve current deadlines";
const ADD_FAILED: &str = "Failed to add deadline";
const DELETE_FAILED: &str = "Failed to delete deadline";
const UPDATE_FAILED: &str = "Failed to update deadline";
const COMPLETE_FAILED: &str = "Failed to mark deadline as completed";
const INCOMPLETE_FAILED: &str = "Failed to mark deadline as incomplete";

/// `?username=` for the list endpoints
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

impl UserQuery {
    /// Absent or empty means no user, which matches no rows.
    fn user(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }
}

/// Add deadline request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddDeadlineRequest {
    pub username: Option<String>,
    pub task: Option<String>,
    pub deadline: Option<String>,
}

/// Body of delete/complete/mark-incomplete
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeadlineIdRequest {
    pub id: Option<Value>,
}

/// Update deadline request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDeadlineRequest {
    pub id: Option<Value>,
    pub task: Option<String>,
    pub date: Option<String>,
}

type Message = (StatusCode, Json<&'static str>);

fn message(status: StatusCode, text: &'static str) -> Message {
    (status, Json(text))
}

/// GET /all_deadlines - every deadline of a user
async fn all_deadlines(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<DeadlineList>, ApiError> {
    let Some(user) = query.user() else {
        return Ok(Json(DeadlineList::default()));
    };

    let rows = state
        .store
        .list_all(user)
        .await
        .map_err(ApiError::store(LIST_ALL_FAILED))?;

    tracing::debug!(user, count = rows.len(), "listed all deadlines");
    Ok(Json(DeadlineList::from_rows(&rows)))
}

/// GET /past_deadlines - overdue or completed, latest first
async fn past_deadlines(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<DeadlineList>, ApiError> {
    let Some(user) = query.user() else {
        return Ok(Json(DeadlineList::default()));
    };

    let today = state.clock.today();
    let rows = state
        .store
        .list_past(user, today)
        .await
        .map_err(ApiError::store(LIST_PAST_FAILED))?;

    tracing::debug!(user, %today, count = rows.len(), "listed past deadlines");
    Ok(Json(DeadlineList::from_rows(&rows)))
}

/// GET /current_deadlines - upcoming and incomplete, soonest first
async fn current_deadlines(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<DeadlineList>, ApiError> {
    let Some(user) = query.user() else {
        return Ok(Json(DeadlineList::default()));
    };

    let today = state.clock.today();
    let rows = state
        .store
        .list_current(user, today)
        .await
        .map_err(ApiError::store(LIST_CURRENT_FAILED))?;

    tracing::debug!(user, %today, count = rows.len(), "listed current deadlines");
    Ok(Json(DeadlineList::from_rows(&rows)))
}

/// POST /add_deadline
async fn add_deadline(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AddDeadlineRequest>,
) -> Result<Message, ApiError> {
    let deadline = NewDeadline::new(req.username, req.task, req.deadline)?;

    state
        .store
        .add(&deadline)
        .await
        .map_err(ApiError::store(ADD_FAILED))?;

    tracing::info!(user = %deadline.user_id, date = %deadline.deadline_date, "deadline added");
    Ok(message(StatusCode::CREATED, ADDED))
}

/// POST /delete_deadline - succeeds even when no row matched
async fn delete_deadline(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DeadlineIdRequest>,
) -> Result<Message, ApiError> {
    let id = DeadlineId::from_json(req.id.as_ref())?;

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store(DELETE_FAILED))?;

    tracing::info!(%id, deleted, "deadline deleted");
    Ok(message(StatusCode::OK, DELETED))
}

/// POST /update_deadline - task and/or date, both optional
async fn update_deadline(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UpdateDeadlineRequest>,
) -> Result<Message, ApiError> {
    let id = DeadlineId::from_json(req.id.as_ref())?;
    let changes = DeadlineUpdate::new(req.task, req.date)?;

    if changes.is_empty() {
        tracing::debug!(%id, "update without changes");
        return Ok(message(StatusCode::OK, UPDATED));
    }

    state
        .store
        .update(id, &changes)
        .await
        .map_err(ApiError::store(UPDATE_FAILED))?;

    tracing::info!(
        %id,
        task = changes.task.is_some(),
        date = changes.deadline_date.is_some(),
        "deadline updated"
    );
    Ok(message(StatusCode::OK, UPDATED))
}

/// POST /complete_deadline
async fn complete_deadline(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DeadlineIdRequest>,
) -> Result<Message, ApiError> {
    set_completed(&state, req, true).await?;
    Ok(message(StatusCode::OK, COMPLETED))
}

/// POST /mark_incomplete
async fn mark_incomplete(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DeadlineIdRequest>,
) -> Result<Message, ApiError> {
    set_completed(&state, req, false).await?;
    Ok(message(StatusCode::OK, INCOMPLETE))
}

async fn set_completed(
    state: &AppState,
    req: DeadlineIdRequest,
    completed: bool,
) -> Result<(), ApiError> {
    let id = DeadlineId::from_json(req.id.as_ref())?;
    let failed = if completed {
        COMPLETE_FAILED
    } else {
        INCOMPLETE_FAILED
    };

    let affected = state
        .store
        .set_completed(id, completed)
        .await
        .map_err(ApiError::store(failed))?;

    if affected == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(%id, completed, "deadline completion changed");
    Ok(())
}

/// Deadline routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/all_deadlines", get(all_deadlines))
        .route("/past_deadlines", get(past_deadlines))
        .route("/current_deadlines", get(current_deadlines))
        .route("/add_deadline", post(add_deadline))
        .route("/delete_deadline", post(delete_deadline))
        .route("/update_deadline", post(update_deadline))
        .route("/complete_deadline", post(complete_deadline))
        .route("/mark_incomplete", post(mark_incomplete))
}
