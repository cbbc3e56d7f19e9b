//! Core domain logic for ticklist.
//! This crate is the single source of truth for task lifecycle invariants.

pub mod agenda;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use agenda::{build_agenda, classify_due, AgendaSection, DueBucket};
pub use logging::{default_log_level, init_logging};
pub use model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
pub use service::task_service::{TaskService, TaskServiceError};
