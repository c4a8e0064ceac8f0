//! Project/task operations over a [`ProjectStore`].
//!
//! Check order for every operation: id syntax, then input validation, then
//! existence (project before task). Validation always completes before the
//! first store call, so a rejected request never writes anything.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CoreError;
use crate::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use crate::store::ProjectStore;
use crate::task::{CreateTask, Task, UpdateTask};

/// Cheaply cloneable handle over the injected store.
#[derive(Clone)]
pub struct TaskBoard {
    store: Arc<dyn ProjectStore>,
}

impl TaskBoard {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// All projects newest first, each joined with its tasks.
    pub async fn list_projects(&self) -> Result<Vec<ProjectWithTasks>, CoreError> {
        let projects = self.store.list_projects().await?;
        let ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();

        let mut by_project: HashMap<String, Vec<Task>> = HashMap::new();
        for task in self.store.list_tasks_for_projects(&ids).await? {
            by_project
                .entry(task.project_id.clone())
                .or_default()
                .push(task);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let tasks = by_project.remove(&project.id).unwrap_or_default();
                ProjectWithTasks::new(project, tasks)
            })
            .collect())
    }

    pub async fn get_project(&self, id: &str) -> Result<ProjectWithTasks, CoreError> {
        self.store.check_project_id(id)?;
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id))?;
        self.with_tasks(project).await
    }

    pub async fn create_project(
        &self,
        input: &CreateProject,
    ) -> Result<ProjectWithTasks, CoreError> {
        let new = input.validate()?;
        let project = self.store.create_project(&new).await?;
        tracing::info!(
            project_id = %project.id,
            backend = self.store.backend_name(),
            "Project created"
        );
        Ok(ProjectWithTasks::new(project, Vec::new()))
    }

    pub async fn update_project(
        &self,
        id: &str,
        input: &UpdateProject,
    ) -> Result<ProjectWithTasks, CoreError> {
        self.store.check_project_id(id)?;
        let changes = input.validate()?;
        let project = self
            .store
            .update_project(id, &changes)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id))?;
        self.with_tasks(project).await
    }

    /// Delete a project and, unconditionally, all of its tasks.
    pub async fn delete_project(&self, id: &str) -> Result<Project, CoreError> {
        self.store.check_project_id(id)?;
        let project = self
            .store
            .delete_project(id)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id))?;
        tracing::info!(project_id = %id, "Project deleted with its tasks");
        Ok(project)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, CoreError> {
        self.store.check_project_id(project_id)?;
        self.require_project(project_id).await?;
        self.store.list_tasks(project_id).await
    }

    pub async fn get_task(&self, project_id: &str, task_id: &str) -> Result<Task, CoreError> {
        self.check_ids(project_id, task_id)?;
        self.require_project(project_id).await?;
        self.store
            .find_task(project_id, task_id)
            .await?
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    pub async fn create_task(
        &self,
        project_id: &str,
        input: &CreateTask,
    ) -> Result<Task, CoreError> {
        self.store.check_project_id(project_id)?;
        let new = input.validate()?;
        let task = self
            .store
            .create_task(project_id, &new)
            .await?
            .ok_or_else(|| CoreError::project_not_found(project_id))?;
        tracing::info!(project_id, task_id = %task.id, status = %task.status, "Task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        input: &UpdateTask,
    ) -> Result<Task, CoreError> {
        self.check_ids(project_id, task_id)?;
        let changes = input.validate()?;
        self.require_project(project_id).await?;
        self.store
            .update_task(project_id, task_id, &changes)
            .await?
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    pub async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<Task, CoreError> {
        self.check_ids(project_id, task_id)?;
        self.require_project(project_id).await?;
        self.store
            .delete_task(project_id, task_id)
            .await?
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn check_ids(&self, project_id: &str, task_id: &str) -> Result<(), CoreError> {
        self.store.check_project_id(project_id)?;
        self.store.check_task_id(task_id)
    }

    async fn require_project(&self, id: &str) -> Result<Project, CoreError> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id))
    }

    async fn with_tasks(&self, project: Project) -> Result<ProjectWithTasks, CoreError> {
        let tasks = self.store.list_tasks(&project.id).await?;
        Ok(ProjectWithTasks::new(project, tasks))
    }
}
