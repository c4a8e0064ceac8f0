//! Field limits and normalization helpers shared by project and task DTOs.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project name in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 200;

/// Maximum length of a project description in characters.
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum length of a task title in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 200;

/// Maximum length of a task description in characters.
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim a required field, returning `None` when it is missing or blank.
pub fn required_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trim an optional field, defaulting to an empty string.
pub fn trimmed_or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Reject values longer than `max` characters.
///
/// `message` is returned verbatim as the validation error.
pub fn check_max_length(value: &str, max: usize, message: &str) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(())
}

/// Trim participant references and reject blank entries.
pub fn normalize_participants(participants: &[String]) -> Result<Vec<String>, CoreError> {
    participants
        .iter()
        .map(|p| {
            let p = p.trim();
            if p.is_empty() {
                Err(CoreError::Validation(
                    "Participant ids cannot be empty".into(),
                ))
            } else {
                Ok(p.to_string())
            }
        })
        .collect()
}
