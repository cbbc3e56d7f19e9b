//! HTTP handlers for the task API.
//!
//! # Responsibility
//! - Translate HTTP requests into task service calls.
//! - Map service errors onto wire status codes and `{"error": ...}` bodies.
//!
//! # Invariants
//! - Validation failures return 400 and never reach the store.
//! - Store and lookup failures collapse to 500 with a fixed message.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use log::error;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use ticklist_core::{
    NewTask, SqliteTaskRepository, Task, TaskId, TaskPatch, TaskService, TaskServiceError,
};

use crate::state::AppState;

/// Error response body, `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Create request body.
///
/// `title` stays optional here so an absent key reaches title validation and
/// reports 400 instead of failing body extraction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

/// GET /tasks
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let conn = state.conn.lock().await;
    match with_task_service(&conn, |service| service.list()) {
        Ok(tasks) => Ok(Json(tasks)),
        Err(err) => Err(internal_error("task_list", "Failed to fetch tasks.", &err)),
    }
}

/// POST /tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = NewTask {
        title: body.title.unwrap_or_default(),
        description: body.description,
        due_date: body.due_date,
    };

    let conn = state.conn.lock().await;
    match with_task_service(&conn, |service| service.create(input)) {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(TaskServiceError::Validation(_)) => Err(bad_request("Title is required.")),
        Err(err) => Err(internal_error("task_create", "Failed to create task.", &err)),
    }
}

/// PUT /tasks/{id}
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let conn = state.conn.lock().await;
    match with_task_service(&conn, |service| service.update(id, &patch)) {
        Ok(task) => Ok(Json(task)),
        Err(TaskServiceError::Validation(err)) => Err(bad_request(err.to_string())),
        Err(err) => Err(internal_error("task_update", "Failed to update task.", &err)),
    }
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    let conn = state.conn.lock().await;
    match with_task_service(&conn, |service| service.soft_delete(id)) {
        Ok(task) => Ok(Json(task)),
        Err(err) => Err(internal_error("task_delete", "Failed to delete task.", &err)),
    }
}

fn with_task_service<T>(
    conn: &Connection,
    f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> Result<T, TaskServiceError>,
) -> Result<T, TaskServiceError> {
    let repo = SqliteTaskRepository::try_new(conn)?;
    f(&TaskService::new(repo))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn internal_error(event: &'static str, message: &str, err: &TaskServiceError) -> ApiError {
    error!("event={event} module=server status=error error={err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}
