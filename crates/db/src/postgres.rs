//! PostgreSQL store.
//!
//! Keys are `BIGSERIAL` and cross the store boundary as decimal strings.
//! Anything that does not parse as a positive integer is an invalid id.
//! `tasks.project_id` references `projects.id` with `ON DELETE CASCADE`.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use taskboard_core::error::CoreError;
use taskboard_core::project::{NewProject, Project, ProjectChanges};
use taskboard_core::store::ProjectStore;
use taskboard_core::task::{NewTask, Task, TaskChanges, TaskStatus};
use taskboard_core::types::Timestamp;

/// Column lists shared across queries to avoid repetition.
const PROJECT_COLUMNS: &str = "id, name, description, participants, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, assignee, created_at, updated_at";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `projects` table.
#[derive(Debug, FromRow)]
struct ProjectRow {
    id: i64,
    name: String,
    description: String,
    participants: Vec<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id.to_string(),
            name: row.name,
            description: row.description,
            participants: row.participants,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row from the `tasks` table.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    project_id: i64,
    title: String,
    description: String,
    status: String,
    assignee: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<TaskStatus>().map_err(|_| {
            CoreError::Internal(format!(
                "task {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(Task {
            id: row.id.to_string(),
            project_id: row.project_id.to_string(),
            title: row.title,
            description: row.description,
            assignee: row.assignee,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn tasks_from_rows(rows: Vec<TaskRow>) -> Result<Vec<Task>, CoreError> {
    rows.into_iter().map(Task::try_from).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a decimal `BIGSERIAL` key.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<i64, CoreError> {
    let invalid = || CoreError::InvalidId {
        entity,
        id: raw.to_string(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

/// Log a sqlx failure and hide it behind [`CoreError::Internal`].
fn db_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Provides project and task persistence on a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn check_project_id(&self, id: &str) -> Result<(), CoreError> {
        parse_id("Project", id).map(|_| ())
    }

    fn check_task_id(&self, id: &str) -> Result<(), CoreError> {
        parse_id("Task", id).map(|_| ())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(db_error)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let query =
            format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        let id = parse_id("Project", id)?;
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(Project::from))
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, CoreError> {
        let query = format!(
            "INSERT INTO projects (name, description, participants)
             VALUES ($1, $2, $3)
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.participants)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.into())
    }

    async fn update_project(
        &self,
        id: &str,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, CoreError> {
        let id = parse_id("Project", id)?;
        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = COALESCE($3, description),
                participants = COALESCE($4, participants),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.participants)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(Project::from))
    }

    async fn delete_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        let id = parse_id("Project", id)?;
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let removed_tasks = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {PROJECT_COLUMNS}");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_error)?;
            return Ok(None);
        };
        tx.commit().await.map_err(db_error)?;

        tracing::debug!(project_id = id, removed_tasks, "Cascaded project delete");
        Ok(Some(row.into()))
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, CoreError> {
        let project_id = parse_id("Project", project_id)?;
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        tasks_from_rows(rows)
    }

    async fn list_tasks_for_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<Task>, CoreError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = project_ids
            .iter()
            .map(|id| parse_id("Project", id))
            .collect::<Result<Vec<i64>, _>>()?;
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ANY($1) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        tasks_from_rows(rows)
    }

    async fn find_task(&self, project_id: &str, task_id: &str) -> Result<Option<Task>, CoreError> {
        let project_id = parse_id("Project", project_id)?;
        let task_id = parse_id("Task", task_id)?;
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Task::try_from)
            .transpose()
    }

    /// Inserts only when the project exists, in a single statement.
    async fn create_task(
        &self,
        project_id: &str,
        input: &NewTask,
    ) -> Result<Option<Task>, CoreError> {
        let project_id = parse_id("Project", project_id)?;
        let query = format!(
            "INSERT INTO tasks (project_id, title, description, status, assignee)
             SELECT p.id, $2, $3, $4, $5 FROM projects p WHERE p.id = $1
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(&input.assignee)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Task::try_from)
            .transpose()
    }

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, CoreError> {
        let project_id = parse_id("Project", project_id)?;
        let task_id = parse_id("Task", task_id)?;
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                assignee = COALESCE($6, assignee),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(task_id)
            .bind(project_id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(&changes.assignee)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Task::try_from)
            .transpose()
    }

    async fn delete_task(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>, CoreError> {
        let project_id = parse_id("Project", project_id)?;
        let task_id = parse_id("Task", task_id)?;
        let query = format!(
            "DELETE FROM tasks WHERE id = $1 AND project_id = $2 RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Task::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_positive_decimal_ids() {
        assert_eq!(parse_id("Project", "42").unwrap(), 42);
    }

    #[test]
    fn rejects_malformed_ids() {
        let malformed = [
            "",
            "0",
            "-1",
            "+1",
            "abc",
            "1.5",
            "proj_1758306032508_uykqi95ei",
            "99999999999999999999",
        ];
        for raw in malformed {
            assert_matches!(
                parse_id("Project", raw),
                Err(CoreError::InvalidId { entity: "Project", .. }),
                "{raw} should be rejected"
            );
        }
    }
}
