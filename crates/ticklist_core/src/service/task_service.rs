//! Task use-case service.
//!
//! # Responsibility
//! - Validate write inputs before persistence.
//! - Apply partial-update and soft-delete semantics over the repository.
//! - Return full read-back records for every mutation.
//!
//! # Invariants
//! - Validation happens before any store mutation; no partial state becomes
//!   visible.
//! - `update` never changes fields absent from the patch and never touches
//!   the tombstone.
//! - `soft_delete` is idempotent; the first tombstone timestamp wins.

use crate::model::task::{validate_title, NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Write input failed validation.
    Validation(TaskValidationError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one task and returns the stored record.
    ///
    /// The store assigns `id` and `created_at`; `is_completed` starts false
    /// and the tombstone starts clear.
    pub fn create(&self, input: NewTask) -> Result<Task, TaskServiceError> {
        validate_title(&input.title)?;

        let id = self.repo.create_task(&input)?;
        self.repo
            .get_task(id, false)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    /// Applies a sparse patch and returns the stored record.
    ///
    /// Absent fields stay untouched; `due_date: Some(None)` clears the date.
    /// Soft-deleted tasks accept patches without being resurrected. An empty
    /// patch changes nothing but still reads the task back.
    pub fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, TaskServiceError> {
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }

        self.repo.update_task(id, patch)?;
        self.repo
            .get_task(id, true)?
            .ok_or(TaskServiceError::InconsistentState(
                "updated task not found in read-back",
            ))
    }

    /// Soft-deletes one task and returns the tombstoned record.
    ///
    /// Deleting an already-deleted task succeeds and keeps the original
    /// `deleted_at`; only an unknown id is an error.
    pub fn soft_delete(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo.soft_delete_task(id)?;
        self.repo
            .get_task(id, true)?
            .ok_or(TaskServiceError::InconsistentState(
                "deleted task not found in read-back",
            ))
    }

    /// Lists active tasks, most recently created first.
    pub fn list(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_tasks(&TaskListQuery::default())?)
    }
}
