//! Task API endpoints
//!
//! RESTful API for task CRUD operations.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use tm_core::page::Page;
use tm_core::task::{Task, TaskChanges, TaskListQuery};

use crate::error::ApiError;
use crate::routes::list_query;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Body for create and update. A field that is present but null or not a
/// string counts as supplied-and-empty.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn text(value: Option<Value>) -> Option<String> {
    value.map(|value| match value {
        Value::String(text) => text,
        _ => String::new(),
    })
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - Search, sort and paginate tasks
async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<Task>>, ApiError> {
    let query: TaskListQuery = list_query(query);
    let page = state.tasks().list_tasks(&query).await?;
    Ok(Json(page))
}

/// GET /api/tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Task>>, ApiError> {
    let task = state.tasks().get_task(parse_id(&id)?).await?;
    Ok(Json(DataResponse { data: task }))
}

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<Task>>), ApiError> {
    let req = body(payload)?;
    let title = text(req.title).unwrap_or_default();
    let description = text(req.description).unwrap_or_default();

    let created = state.tasks().create_task(&title, &description).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Task created",
            data: created,
        }),
    ))
}

/// PUT /api/tasks/{id} - Update title and/or description
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<MessageResponse<Task>>, ApiError> {
    let id = parse_id(&id)?;
    let req = body(payload)?;
    let changes = TaskChanges {
        title: text(req.title),
        description: text(req.description),
    };

    let updated = state.tasks().update_task(id, changes).await?;

    Ok(Json(MessageResponse {
        message: "Task updated",
        data: updated,
    }))
}

/// DELETE /api/tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<Task>>, ApiError> {
    let removed = state.tasks().delete_task(parse_id(&id)?).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted",
        data: removed,
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
