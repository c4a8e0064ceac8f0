pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                      list, create
/// /projects/{project_id}                         get, update, delete
/// /projects/{project_id}/tasks                   list, create
/// /projects/{project_id}/tasks/{task_id}         get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", project::router())
}
