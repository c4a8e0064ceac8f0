//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};

use crate::error::AppResult;
use crate::middleware::json::JsonBody;
use crate::state::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectWithTasks>>> {
    let projects = state.board.list_projects().await?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectWithTasks>)> {
    let project = state.board.create_project(&input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/{project_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<ProjectWithTasks>> {
    let project = state.board.get_project(&project_id).await?;
    Ok(Json(project))
}

/// PUT /api/projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    JsonBody(input): JsonBody<UpdateProject>,
) -> AppResult<Json<ProjectWithTasks>> {
    let project = state.board.update_project(&project_id, &input).await?;
    Ok(Json(project))
}

/// DELETE /api/projects/{project_id}
///
/// Responds with the deleted project (without its tasks, which are gone too).
pub async fn delete(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<Project>> {
    let project = state.board.delete_project(&project_id).await?;
    Ok(Json(project))
}
