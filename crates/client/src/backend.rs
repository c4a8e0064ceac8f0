//! Seam between the client store and wherever projects live.

use async_trait::async_trait;
use taskboard_core::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use taskboard_core::task::{CreateTask, Task, UpdateTask};

use crate::error::ClientError;

/// Operations the client store needs from a backend.
///
/// Mirrors the HTTP API one call per method. Implementations never retry.
#[async_trait]
pub trait ProjectsBackend: Send + Sync {
    /// Every project with its tasks, newest project first.
    async fn list_projects(&self) -> Result<Vec<ProjectWithTasks>, ClientError>;

    async fn create_project(&self, input: &CreateProject) -> Result<ProjectWithTasks, ClientError>;

    async fn update_project(
        &self,
        id: &str,
        input: &UpdateProject,
    ) -> Result<ProjectWithTasks, ClientError>;

    /// Returns the deleted project; its tasks are gone with it.
    async fn delete_project(&self, id: &str) -> Result<Project, ClientError>;

    async fn create_task(&self, project_id: &str, input: &CreateTask) -> Result<Task, ClientError>;

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        input: &UpdateTask,
    ) -> Result<Task, ClientError>;

    async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<Task, ClientError>;
}
