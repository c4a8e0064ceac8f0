//! Persistence seam for projects and tasks.
//!
//! Implementations receive already-validated input ([`NewProject`],
//! [`TaskChanges`], ...). Lookups that miss return `Ok(None)`; callers decide
//! which entity to report as not found.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::project::{NewProject, Project, ProjectChanges};
use crate::task::{NewTask, Task, TaskChanges};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Reject project ids that can never resolve in this backend.
    ///
    /// Backends with opaque string ids accept anything.
    fn check_project_id(&self, _id: &str) -> Result<(), CoreError> {
        Ok(())
    }

    /// Reject task ids that can never resolve in this backend.
    fn check_task_id(&self, _id: &str) -> Result<(), CoreError> {
        Ok(())
    }

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;

    // --- Projects ---

    /// All projects, newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError>;

    async fn find_project(&self, id: &str) -> Result<Option<Project>, CoreError>;

    async fn create_project(&self, input: &NewProject) -> Result<Project, CoreError>;

    /// Returns `None` if no project with `id` exists.
    async fn update_project(
        &self,
        id: &str,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, CoreError>;

    /// Delete a project and every task referencing it. Returns the removed
    /// project, or `None` if it did not exist.
    async fn delete_project(&self, id: &str) -> Result<Option<Project>, CoreError>;

    // --- Tasks ---

    /// Tasks of one project in creation order.
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, CoreError>;

    /// Tasks of every project in `project_ids`, in creation order.
    async fn list_tasks_for_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<Task>, CoreError>;

    /// Returns `None` unless the task exists and belongs to `project_id`.
    async fn find_task(&self, project_id: &str, task_id: &str) -> Result<Option<Task>, CoreError>;

    /// Returns `None` if the project does not exist.
    async fn create_task(
        &self,
        project_id: &str,
        input: &NewTask,
    ) -> Result<Option<Task>, CoreError>;

    /// Returns `None` unless the task exists and belongs to `project_id`.
    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, CoreError>;

    /// Returns `None` unless the task exists and belongs to `project_id`.
    async fn delete_task(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>, CoreError>;
}
