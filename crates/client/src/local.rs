//! Standalone backend persisting every project to one JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use taskboard_core::demo::demo_project;
use taskboard_core::error::CoreError;
use taskboard_core::ids;
use taskboard_core::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use taskboard_core::task::{CreateTask, Task, UpdateTask};

use crate::backend::ProjectsBackend;
use crate::error::ClientError;

/// Name given to projects created with a blank name.
pub const DEFAULT_PROJECT_NAME: &str = "New project";

/// [`ProjectsBackend`] keeping the whole project list in a JSON file.
///
/// The file is rewritten after every successful mutation. A missing file
/// starts the board with the demo project.
#[derive(Debug)]
pub struct LocalBackend {
    path: PathBuf,
    projects: Mutex<Vec<ProjectWithTasks>>,
}

impl LocalBackend {
    /// Load `path`, or seed it with the demo project if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let projects = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| ClientError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No project file yet, seeding demo project");
                let seeded = vec![demo_project()];
                write_file(&path, &seeded).await?;
                seeded
            }
            Err(source) => return Err(ClientError::Storage { path, source }),
        };

        Ok(Self {
            path,
            projects: Mutex::new(projects),
        })
    }
}

async fn write_file(path: &Path, projects: &[ProjectWithTasks]) -> Result<(), ClientError> {
    let bytes = serde_json::to_vec_pretty(projects).map_err(|source| ClientError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| ClientError::Storage {
            path: path.to_path_buf(),
            source,
        })
}

/// Index of project `id`, or a not-found error.
fn position(projects: &[ProjectWithTasks], id: &str) -> Result<usize, ClientError> {
    projects
        .iter()
        .position(|p| p.id() == id)
        .ok_or_else(|| CoreError::project_not_found(id).into())
}

fn task_position(project: &ProjectWithTasks, task_id: &str) -> Result<usize, ClientError> {
    project
        .tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| CoreError::task_not_found(task_id).into())
}

#[async_trait]
impl ProjectsBackend for LocalBackend {
    async fn list_projects(&self) -> Result<Vec<ProjectWithTasks>, ClientError> {
        Ok(self.projects.lock().await.clone())
    }

    async fn create_project(&self, input: &CreateProject) -> Result<ProjectWithTasks, ClientError> {
        let named = match input.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => input.clone(),
            _ => CreateProject {
                name: Some(DEFAULT_PROJECT_NAME.to_string()),
                ..input.clone()
            },
        };
        let new = named.validate()?;

        let now = Utc::now();
        let project = ProjectWithTasks::new(
            Project {
                id: ids::project_id(),
                name: new.name,
                description: new.description,
                participants: new.participants,
                created_at: now,
                updated_at: now,
            },
            Vec::new(),
        );

        let mut projects = self.projects.lock().await;
        let mut next = projects.clone();
        next.insert(0, project.clone());
        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(project)
    }

    async fn update_project(
        &self,
        id: &str,
        input: &UpdateProject,
    ) -> Result<ProjectWithTasks, ClientError> {
        let changes = input.validate()?;

        let mut projects = self.projects.lock().await;
        let index = position(&projects, id)?;
        let mut next = projects.clone();
        let project = &mut next[index];
        changes.apply_to(&mut project.project);
        project.project.updated_at = Utc::now();
        let updated = project.clone();

        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(updated)
    }

    async fn delete_project(&self, id: &str) -> Result<Project, ClientError> {
        let mut projects = self.projects.lock().await;
        let index = position(&projects, id)?;
        let mut next = projects.clone();
        let removed = next.remove(index);

        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(removed.project)
    }

    async fn create_task(&self, project_id: &str, input: &CreateTask) -> Result<Task, ClientError> {
        let new = input.validate()?;

        let mut projects = self.projects.lock().await;
        let index = position(&projects, project_id)?;
        let now = Utc::now();
        let task = Task {
            id: ids::task_id(),
            project_id: project_id.to_string(),
            title: new.title,
            description: new.description,
            assignee: new.assignee,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        let mut next = projects.clone();
        next[index].tasks.push(task.clone());

        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(task)
    }

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        input: &UpdateTask,
    ) -> Result<Task, ClientError> {
        let changes = input.validate()?;

        let mut projects = self.projects.lock().await;
        let index = position(&projects, project_id)?;
        let task_index = task_position(&projects[index], task_id)?;
        let mut next = projects.clone();
        let task = &mut next[index].tasks[task_index];
        changes.apply_to(task);
        task.updated_at = Utc::now();
        let updated = task.clone();

        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(updated)
    }

    async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<Task, ClientError> {
        let mut projects = self.projects.lock().await;
        let index = position(&projects, project_id)?;
        let task_index = task_position(&projects[index], task_id)?;
        let mut next = projects.clone();
        let removed = next[index].tasks.remove(task_index);

        write_file(&self.path, &next).await?;
        *projects = next;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use taskboard_core::task::TaskStatus;

    use super::*;

    fn file_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("projects.json")
    }

    #[tokio::test]
    async fn first_open_seeds_demo_project_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::open(file_in(&dir)).await.unwrap();

        let projects = backend.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project.name, "Demo Project");
        assert_eq!(projects[0].tasks.len(), 3);
        assert!(file_in(&dir).exists());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let backend = LocalBackend::open(file_in(&dir)).await.unwrap();
            let project = backend
                .create_project(&CreateProject::named("Sprint 1"))
                .await
                .unwrap();
            backend
                .create_task(project.id(), &CreateTask::titled("Write spec"))
                .await
                .unwrap();
            project
        };

        let reopened = LocalBackend::open(file_in(&dir)).await.unwrap();
        let projects = reopened.list_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id(), created.id());
        assert_eq!(projects[0].tasks.len(), 1);
        assert_eq!(projects[0].tasks[0].status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn blank_name_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::open(file_in(&dir)).await.unwrap();

        let project = backend
            .create_project(&CreateProject::named("   "))
            .await
            .unwrap();
        assert_eq!(project.project.name, DEFAULT_PROJECT_NAME);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(file_in(&dir), b"{ definitely not a list").unwrap();

        let result = LocalBackend::open(file_in(&dir)).await;
        assert_matches!(result, Err(ClientError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn task_operations_are_scoped_to_their_project() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::open(file_in(&dir)).await.unwrap();
        let demo = backend.list_projects().await.unwrap().remove(0);
        let other = backend
            .create_project(&CreateProject::named("Other"))
            .await
            .unwrap();
        let task_id = demo.tasks[0].id.clone();

        let result = backend
            .update_task(other.id(), &task_id, &UpdateTask::status(TaskStatus::Done))
            .await;
        assert_matches!(
            result,
            Err(ClientError::Core(CoreError::NotFound { entity: "Task", .. }))
        );

        let deleted = backend.delete_task(demo.id(), &task_id).await.unwrap();
        assert_eq!(deleted.id, task_id);
        let projects = backend.list_projects().await.unwrap();
        let demo_now = projects.iter().find(|p| p.id() == demo.id()).unwrap();
        assert_eq!(demo_now.tasks.len(), 2);
    }

    #[tokio::test]
    async fn invalid_task_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::open(file_in(&dir)).await.unwrap();
        let before = std::fs::read(file_in(&dir)).unwrap();
        let demo_id = backend.list_projects().await.unwrap()[0].id().to_string();

        let result = backend
            .create_task(
                &demo_id,
                &CreateTask {
                    title: Some("Blocked".into()),
                    status: Some("blocked".into()),
                    ..CreateTask::default()
                },
            )
            .await;
        assert_matches!(result, Err(ClientError::Core(CoreError::Validation(_))));
        assert_eq!(std::fs::read(file_in(&dir)).unwrap(), before);
    }

    #[tokio::test]
    async fn delete_project_drops_its_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::open(file_in(&dir)).await.unwrap();
        let demo_id = backend.list_projects().await.unwrap()[0].id().to_string();

        let removed = backend.delete_project(&demo_id).await.unwrap();
        assert_eq!(removed.id, demo_id);
        assert!(backend.list_projects().await.unwrap().is_empty());

        let result = backend.delete_project(&demo_id).await;
        assert_matches!(
            result,
            Err(ClientError::Core(CoreError::NotFound { entity: "Project", .. }))
        );
    }
}
