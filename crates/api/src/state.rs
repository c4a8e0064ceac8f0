use std::sync::Arc;

use taskboard_core::board::TaskBoard;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the board holds its store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Project/task operations over the store chosen at startup.
    pub board: TaskBoard,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(board: TaskBoard, config: ServerConfig) -> Self {
        Self {
            board,
            config: Arc::new(config),
        }
    }
}
