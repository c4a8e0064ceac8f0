//! Client-side project state.
//!
//! Every mutation calls the backend first; only a successful call touches
//! local state, and then by building a new snapshot that shares the
//! untouched projects with the previous one. Failures record a message,
//! leave the snapshot as it was and hand the error back to the caller.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use taskboard_core::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use taskboard_core::task::{CreateTask, Task, UpdateTask};

use crate::backend::ProjectsBackend;
use crate::error::ClientError;

/// Immutable view of the project list, newest project first.
pub type Snapshot = Arc<[Arc<ProjectWithTasks>]>;

#[derive(Debug)]
struct State {
    projects: Snapshot,
    loading: bool,
    error: Option<String>,
    /// Ids of projects/tasks with a backend call in flight.
    pending: HashSet<String>,
}

/// Holds the project list and mediates every change through a backend.
///
/// Methods take `&self`; share the store behind an `Arc` to read state
/// while a call is in flight. Locks are never held across an `.await`.
pub struct ProjectsStore<B> {
    backend: B,
    state: RwLock<State>,
}

impl<B: ProjectsBackend> ProjectsStore<B> {
    /// An empty store that reports itself as loading until the first
    /// [`reload`](Self::reload) settles.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RwLock::new(State {
                projects: Arc::from(Vec::new()),
                loading: true,
                error: None,
                pending: HashSet::new(),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn projects(&self) -> Snapshot {
        self.read().projects.clone()
    }

    pub fn project(&self, id: &str) -> Option<Arc<ProjectWithTasks>> {
        self.read().projects.iter().find(|p| p.id() == id).cloned()
    }

    /// Message of the last failed operation, cleared when the next one starts.
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Whether a call touching project or task `id` is in flight.
    pub fn is_pending(&self, id: &str) -> bool {
        self.read().pending.contains(id)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Re-fetch every project and replace local state wholesale.
    pub async fn reload(&self) -> Result<(), ClientError> {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.backend.list_projects().await;

        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "Projects reloaded");
                state.projects = projects.into_iter().map(Arc::new).collect();
                Ok(())
            }
            Err(err) => Err(record_failure(&mut state, err, "Failed to load projects")),
        }
    }

    pub async fn create_project(
        &self,
        input: &CreateProject,
    ) -> Result<ProjectWithTasks, ClientError> {
        self.begin(None);
        let result = self.backend.create_project(input).await;
        self.finish(None, result, "Failed to create project", |projects, created| {
            std::iter::once(Arc::new(created.clone()))
                .chain(projects.iter().cloned())
                .collect()
        })
    }

    pub async fn update_project(
        &self,
        id: &str,
        input: &UpdateProject,
    ) -> Result<ProjectWithTasks, ClientError> {
        self.begin(Some(id));
        let result = self.backend.update_project(id, input).await;
        self.finish(Some(id), result, "Failed to update project", |projects, updated| {
            replace_project(projects, id, |_| updated.clone())
        })
    }

    pub async fn delete_project(&self, id: &str) -> Result<Project, ClientError> {
        self.begin(Some(id));
        let result = self.backend.delete_project(id).await;
        self.finish(Some(id), result, "Failed to delete project", |projects, _| {
            projects.iter().filter(|p| p.id() != id).cloned().collect()
        })
    }

    pub async fn add_task(
        &self,
        project_id: &str,
        input: &CreateTask,
    ) -> Result<Task, ClientError> {
        self.begin(Some(project_id));
        let result = self.backend.create_task(project_id, input).await;
        self.finish(Some(project_id), result, "Failed to create task", |projects, task| {
            replace_project(projects, project_id, |project| {
                let mut next = project.clone();
                next.tasks.push(task.clone());
                next
            })
        })
    }

    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        input: &UpdateTask,
    ) -> Result<Task, ClientError> {
        self.begin(Some(task_id));
        let result = self.backend.update_task(project_id, task_id, input).await;
        self.finish(Some(task_id), result, "Failed to update task", |projects, task| {
            replace_project(projects, project_id, |project| {
                let mut next = project.clone();
                for slot in next.tasks.iter_mut().filter(|t| t.id == task_id) {
                    *slot = task.clone();
                }
                next
            })
        })
    }

    pub async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<Task, ClientError> {
        self.begin(Some(task_id));
        let result = self.backend.delete_task(project_id, task_id).await;
        self.finish(Some(task_id), result, "Failed to delete task", |projects, _| {
            replace_project(projects, project_id, |project| {
                let mut next = project.clone();
                next.tasks.retain(|t| t.id != task_id);
                next
            })
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn begin(&self, entity: Option<&str>) {
        let mut state = self.write();
        state.error = None;
        if let Some(id) = entity {
            state.pending.insert(id.to_string());
        }
    }

    /// Settle a backend call: on success swap in the snapshot built by
    /// `apply`, on failure record the message and keep the old snapshot.
    fn finish<T>(
        &self,
        entity: Option<&str>,
        result: Result<T, ClientError>,
        fallback: &str,
        apply: impl FnOnce(&[Arc<ProjectWithTasks>], &T) -> Snapshot,
    ) -> Result<T, ClientError> {
        let mut state = self.write();
        if let Some(id) = entity {
            state.pending.remove(id);
        }
        match result {
            Ok(value) => {
                let current: &[Arc<ProjectWithTasks>] = &state.projects;
                let next = apply(current, &value);
                state.projects = next;
                Ok(value)
            }
            Err(err) => Err(record_failure(&mut state, err, fallback)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn record_failure(state: &mut State, err: ClientError, fallback: &str) -> ClientError {
    let message = err.user_message(fallback);
    tracing::warn!(error = %err, %message, "Project store operation failed");
    state.error = Some(message);
    err
}

/// New snapshot with project `id` rebuilt by `rebuild`; every other
/// project is shared with `projects`.
fn replace_project(
    projects: &[Arc<ProjectWithTasks>],
    id: &str,
    rebuild: impl FnOnce(&ProjectWithTasks) -> ProjectWithTasks,
) -> Snapshot {
    let mut rebuild = Some(rebuild);
    projects
        .iter()
        .map(|project| {
            if project.id() == id {
                if let Some(rebuild) = rebuild.take() {
                    return Arc::new(rebuild(project.as_ref()));
                }
            }
            Arc::clone(project)
        })
        .collect()
}
