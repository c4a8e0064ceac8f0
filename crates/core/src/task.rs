//! Task entity, workflow status and request DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};
use crate::validation::{
    check_max_length, required_trimmed, trimmed_or_empty, MAX_TASK_DESCRIPTION_LENGTH,
    MAX_TASK_TITLE_LENGTH,
};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Workflow state of a task. Also the kanban column it is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(
                    "Invalid status. Must be one of: todo, in_progress, done".into(),
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored task. Always references exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a task under a project.
///
/// `status` is kept as a raw string so an unknown value is reported with
/// the domain message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// DTO for a partial task update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A validated, normalized task ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub status: TaskStatus,
}

/// Validated partial changes to an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
}

impl CreateTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Title is checked before status; an empty status string counts as
    /// omitted and defaults to `todo`.
    pub fn validate(&self) -> Result<NewTask, CoreError> {
        let title = required_trimmed(self.title.as_deref())
            .ok_or_else(|| CoreError::Validation("Task title is required".into()))?;
        let status = match self.status.as_deref() {
            None | Some("") => TaskStatus::default(),
            Some(raw) => raw.parse()?,
        };
        check_title_length(&title)?;
        let description = trimmed_or_empty(self.description.as_deref());
        check_description_length(&description)?;

        Ok(NewTask {
            title,
            description,
            assignee: trimmed_or_empty(self.assignee.as_deref()),
            status,
        })
    }
}

impl UpdateTask {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<TaskChanges, CoreError> {
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::from_str)
            .transpose()?;

        let title = match self.title.as_deref() {
            Some(raw) => {
                let title = required_trimmed(Some(raw))
                    .ok_or_else(|| CoreError::Validation("Task title cannot be empty".into()))?;
                check_title_length(&title)?;
                Some(title)
            }
            None => None,
        };

        let description = match self.description.as_deref() {
            Some(raw) => {
                let description = raw.trim().to_string();
                check_description_length(&description)?;
                Some(description)
            }
            None => None,
        };

        Ok(TaskChanges {
            title,
            description,
            assignee: self.assignee.as_deref().map(|a| a.trim().to_string()),
            status,
        })
    }
}

impl TaskChanges {
    /// Apply these changes to `task` in place. Does not touch timestamps.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(assignee) = &self.assignee {
            task.assignee.clone_from(assignee);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

fn check_title_length(title: &str) -> Result<(), CoreError> {
    check_max_length(
        title,
        MAX_TASK_TITLE_LENGTH,
        "Task title cannot exceed 200 characters",
    )
}

fn check_description_length(description: &str) -> Result<(), CoreError> {
    check_max_length(
        description,
        MAX_TASK_DESCRIPTION_LENGTH,
        "Description cannot exceed 2000 characters",
    )
}
