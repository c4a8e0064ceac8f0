//! Taskboard domain layer.
//!
//! Entities, request DTOs and their validation, the identifier generator,
//! the [`store::ProjectStore`] persistence seam and the [`board::TaskBoard`]
//! service that enforces check ordering on top of it. No I/O lives here.

pub mod board;
pub mod demo;
pub mod error;
pub mod ids;
pub mod project;
pub mod store;
pub mod task;
pub mod types;
pub mod validation;
