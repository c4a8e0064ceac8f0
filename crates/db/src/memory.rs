//! In-memory store keyed by generated string ids.
//!
//! No durability. The single `RwLock` makes each operation atomic, which is
//! the only concurrency guarantee this backend gives.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use taskboard_core::demo::demo_project;
use taskboard_core::error::CoreError;
use taskboard_core::ids;
use taskboard_core::project::{NewProject, Project, ProjectChanges, ProjectWithTasks};
use taskboard_core::store::ProjectStore;
use taskboard_core::task::{NewTask, Task, TaskChanges};

/// Projects and tasks in insertion order, indexed by id.
#[derive(Debug, Default)]
struct Tables {
    projects: IndexMap<String, Project>,
    tasks: IndexMap<String, Task>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo project and its three tasks.
    pub fn with_demo_data() -> Self {
        Self::with_projects(vec![demo_project()])
    }

    /// A store holding the given projects, oldest first.
    pub fn with_projects(projects: Vec<ProjectWithTasks>) -> Self {
        let mut tables = Tables::default();
        for ProjectWithTasks { project, tasks } in projects {
            for task in tasks {
                tables.tasks.insert(task.id.clone(), task);
            }
            tables.projects.insert(project.id.clone(), project);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Number of stored projects and tasks.
    pub async fn counts(&self) -> (usize, usize) {
        let tables = self.tables.read().await;
        (tables.projects.len(), tables.tasks.len())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.values().rev().cloned().collect())
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        Ok(self.tables.read().await.projects.get(id).cloned())
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, CoreError> {
        let now = chrono::Utc::now();
        let project = Project {
            id: ids::project_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            participants: input.participants.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write().await;
        tables.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: &str,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, CoreError> {
        let mut tables = self.tables.write().await;
        let Some(project) = tables.projects.get_mut(id) else {
            return Ok(None);
        };
        changes.apply_to(project);
        project.updated_at = chrono::Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        let mut tables = self.tables.write().await;
        let Some(project) = tables.projects.shift_remove(id) else {
            return Ok(None);
        };
        let before = tables.tasks.len();
        tables.tasks.retain(|_, task| task.project_id != id);
        tracing::debug!(
            project_id = %id,
            removed_tasks = before - tables.tasks.len(),
            "Cascaded project delete"
        );
        Ok(Some(project))
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_tasks_for_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<Task>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| project_ids.contains(&t.project_id))
            .cloned()
            .collect())
    }

    async fn find_task(&self, project_id: &str, task_id: &str) -> Result<Option<Task>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(task_id)
            .filter(|t| t.project_id == project_id)
            .cloned())
    }

    async fn create_task(
        &self,
        project_id: &str,
        input: &NewTask,
    ) -> Result<Option<Task>, CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(project_id) {
            return Ok(None);
        }

        let now = chrono::Utc::now();
        let task = Task {
            id: ids::task_id(),
            project_id: project_id.to_string(),
            title: input.title.clone(),
            description: input.description.clone(),
            assignee: input.assignee.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id.clone(), task.clone());
        Ok(Some(task))
    }

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, CoreError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .get_mut(task_id)
            .filter(|t| t.project_id == project_id)
        else {
            return Ok(None);
        };
        changes.apply_to(task);
        task.updated_at = chrono::Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>, CoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .tasks
            .get(task_id)
            .is_some_and(|t| t.project_id == project_id);
        if !owned {
            return Ok(None);
        }
        Ok(tables.tasks.shift_remove(task_id))
    }
}

#[cfg(test)]
mod tests {
    use taskboard_core::project::CreateProject;
    use taskboard_core::task::{CreateTask, TaskStatus, UpdateTask};

    use super::*;

    fn new_project(name: &str) -> NewProject {
        CreateProject::named(name).validate().unwrap()
    }

    fn new_task(title: &str) -> NewTask {
        CreateTask::titled(title).validate().unwrap()
    }

    #[tokio::test]
    async fn projects_list_newest_first() {
        let store = MemoryStore::new();
        let first = store.create_project(&new_project("First")).await.unwrap();
        let second = store.create_project(&new_project("Second")).await.unwrap();

        let listed = store.list_projects().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn delete_project_cascades_to_tasks() {
        let store = MemoryStore::new();
        let doomed = store.create_project(&new_project("Doomed")).await.unwrap();
        let kept = store.create_project(&new_project("Kept")).await.unwrap();
        store.create_task(&doomed.id, &new_task("a")).await.unwrap();
        store.create_task(&doomed.id, &new_task("b")).await.unwrap();
        let survivor = store
            .create_task(&kept.id, &new_task("c"))
            .await
            .unwrap()
            .unwrap();

        let deleted = store.delete_project(&doomed.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, doomed.id);
        assert_eq!(store.counts().await, (1, 1));
        assert!(store.list_tasks(&doomed.id).await.unwrap().is_empty());
        assert!(store
            .find_task(&kept.id, &survivor.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn task_lookup_is_scoped_to_project() {
        let store = MemoryStore::new();
        let a = store.create_project(&new_project("A")).await.unwrap();
        let b = store.create_project(&new_project("B")).await.unwrap();
        let task = store
            .create_task(&a.id, &new_task("only in A"))
            .await
            .unwrap()
            .unwrap();

        assert!(store.find_task(&b.id, &task.id).await.unwrap().is_none());
        let changes = UpdateTask::status(TaskStatus::Done).validate().unwrap();
        assert!(store
            .update_task(&b.id, &task.id, &changes)
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_task(&b.id, &task.id).await.unwrap().is_none());
        assert_eq!(store.counts().await, (2, 1));
    }

    #[tokio::test]
    async fn create_task_requires_project() {
        let store = MemoryStore::new();
        let created = store
            .create_task("proj_missing", &new_task("orphan"))
            .await
            .unwrap();
        assert!(created.is_none());
        assert_eq!(store.counts().await, (0, 0));
    }

    #[tokio::test]
    async fn tasks_keep_creation_order_after_delete() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("P")).await.unwrap();
        let mut ids = Vec::new();
        for title in ["one", "two", "three"] {
            let t = store
                .create_task(&p.id, &new_task(title))
                .await
                .unwrap()
                .unwrap();
            ids.push(t.id);
        }
        store.delete_task(&p.id, &ids[1]).await.unwrap();

        let titles: Vec<String> = store
            .list_tasks(&p.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn demo_data_is_seeded() {
        let store = MemoryStore::with_demo_data();
        assert_eq!(store.counts().await, (1, 3));
        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects[0].name, "Demo Project");
    }
}
