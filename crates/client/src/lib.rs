//! Client side of the taskboard.
//!
//! - [`store::ProjectsStore`] keeps the project list (tasks embedded) and
//!   applies every successful mutation by structural replacement.
//! - [`http::HttpBackend`] talks to the taskboard API.
//! - [`local::LocalBackend`] is the standalone variant persisting to a JSON file.
//! - [`board::columns`] groups a project's tasks into kanban columns.

pub mod backend;
pub mod board;
pub mod error;
pub mod http;
pub mod local;
pub mod store;

pub use backend::ProjectsBackend;
pub use error::ClientError;
pub use http::HttpBackend;
pub use local::LocalBackend;
pub use store::ProjectsStore;
