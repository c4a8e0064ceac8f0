#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid {} ID", .entity.to_lowercase())]
    InvalidId { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn project_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "Project",
            id: id.to_string(),
        }
    }

    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "Task",
            id: id.to_string(),
        }
    }
}
