//! Project entity, request DTOs and their validated forms.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::task::Task;
use crate::types::{EntityId, Timestamp};
use crate::validation::{
    check_max_length, normalize_participants, required_trimmed, trimmed_or_empty,
    MAX_PROJECT_DESCRIPTION_LENGTH, MAX_PROJECT_NAME_LENGTH,
};

/// A stored project. Tasks are not owned here; see [`ProjectWithTasks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with the tasks that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ProjectWithTasks {
    pub fn new(project: Project, tasks: Vec<Task>) -> Self {
        Self { project, tasks }
    }

    pub fn id(&self) -> &str {
        &self.project.id
    }
}

/// DTO for creating a project.
///
/// Fields are optional at the type level so missing values surface as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
}

/// DTO for updating a project. `name` is required on every update; the
/// other fields are left unchanged when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
}

/// A validated, normalized project ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub participants: Vec<String>,
}

/// Validated changes to apply to an existing project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: String,
    pub description: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl CreateProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewProject, CoreError> {
        let name = validate_name(self.name.as_deref())?;
        let description = trimmed_or_empty(self.description.as_deref());
        validate_description(&description)?;
        let participants = match &self.participants {
            Some(p) => normalize_participants(p)?,
            None => Vec::new(),
        };
        Ok(NewProject {
            name,
            description,
            participants,
        })
    }
}

impl UpdateProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ProjectChanges, CoreError> {
        let name = validate_name(self.name.as_deref())?;
        let description = match self.description.as_deref() {
            Some(d) => {
                let d = d.trim().to_string();
                validate_description(&d)?;
                Some(d)
            }
            None => None,
        };
        let participants = self
            .participants
            .as_deref()
            .map(normalize_participants)
            .transpose()?;
        Ok(ProjectChanges {
            name,
            description,
            participants,
        })
    }
}

impl ProjectChanges {
    /// Apply these changes to `project` in place. Does not touch timestamps.
    pub fn apply_to(&self, project: &mut Project) {
        project.name.clone_from(&self.name);
        if let Some(description) = &self.description {
            project.description.clone_from(description);
        }
        if let Some(participants) = &self.participants {
            project.participants.clone_from(participants);
        }
    }
}

fn validate_name(name: Option<&str>) -> Result<String, CoreError> {
    let name = required_trimmed(name)
        .ok_or_else(|| CoreError::Validation("Project name is required".into()))?;
    check_max_length(
        &name,
        MAX_PROJECT_NAME_LENGTH,
        "Project name cannot exceed 200 characters",
    )?;
    Ok(name)
}

fn validate_description(description: &str) -> Result<(), CoreError> {
    check_max_length(
        description,
        MAX_PROJECT_DESCRIPTION_LENGTH,
        "Description cannot exceed 1000 characters",
    )
}
