//! Handlers for tasks nested under `/projects/{project_id}/tasks`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::task::{CreateTask, Task, UpdateTask};

use crate::error::AppResult;
use crate::middleware::json::JsonBody;
use crate::state::AppState;

/// GET /api/projects/{project_id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.board.list_tasks(&project_id).await?;
    Ok(Json(tasks))
}

/// POST /api/projects/{project_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    JsonBody(input): JsonBody<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = state.board.create_task(&project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/projects/{project_id}/tasks/{task_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> AppResult<Json<Task>> {
    let task = state.board.get_task(&project_id, &task_id).await?;
    Ok(Json(task))
}

/// PUT /api/projects/{project_id}/tasks/{task_id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(String, String)>,
    JsonBody(input): JsonBody<UpdateTask>,
) -> AppResult<Json<Task>> {
    let task = state
        .board
        .update_task(&project_id, &task_id, &input)
        .await?;
    Ok(Json(task))
}

/// DELETE /api/projects/{project_id}/tasks/{task_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> AppResult<Json<Task>> {
    let task = state.board.delete_task(&project_id, &task_id).await?;
    Ok(Json(task))
}
