//! Demo content shown on a fresh install.

use crate::ids;
use crate::project::{Project, ProjectWithTasks};
use crate::task::{Task, TaskStatus};

/// Build the demo project with one task per status, using fresh ids.
pub fn demo_project() -> ProjectWithTasks {
    let now = chrono::Utc::now();
    let project = Project {
        id: ids::project_id(),
        name: "Demo Project".into(),
        description: String::new(),
        participants: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let tasks = [
        (
            "Set up environment",
            "Initialize the project",
            "Ivan",
            TaskStatus::Todo,
        ),
        (
            "Lay out cards",
            "Tailwind classes",
            "Maria",
            TaskStatus::InProgress,
        ),
        ("Docker build", "Nginx image", "", TaskStatus::Done),
    ]
    .into_iter()
    .map(|(title, description, assignee, status)| Task {
        id: ids::task_id(),
        project_id: project.id.clone(),
        title: title.into(),
        description: description.into(),
        assignee: assignee.into(),
        status,
        created_at: now,
        updated_at: now,
    })
    .collect();

    ProjectWithTasks::new(project, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_task_per_status() {
        let demo = demo_project();
        let statuses: Vec<TaskStatus> = demo.tasks.iter().map(|t| t.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert!(demo.tasks.iter().all(|t| t.project_id == demo.project.id));
    }
}
