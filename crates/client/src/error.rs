use std::path::PathBuf;

use taskboard_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The HTTP request itself failed (connect, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to access {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt project file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Validation or lookup failure in the local backend.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Text shown to the user: server and domain messages verbatim,
    /// `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Core(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}
