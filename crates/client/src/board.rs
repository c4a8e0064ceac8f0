//! Kanban view of a project.

use taskboard_core::project::ProjectWithTasks;
use taskboard_core::task::{Task, TaskStatus};

/// One status column of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    /// Tasks with this status, in project order.
    pub tasks: Vec<&'a Task>,
}

pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To do",
        TaskStatus::InProgress => "In progress",
        TaskStatus::Done => "Done",
    }
}

/// Group the project's tasks into the three fixed columns.
pub fn columns(project: &ProjectWithTasks) -> [Column<'_>; 3] {
    TaskStatus::ALL.map(|status| Column {
        status,
        title: column_title(status),
        tasks: project.tasks.iter().filter(|t| t.status == status).collect(),
    })
}
