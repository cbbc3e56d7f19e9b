//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record plus creation and patch inputs.
//! - Own title validation shared by every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `deleted_at` is the source of truth for tombstone state.
//! - A stored task title is never blank.
//! - `due_date` carries calendar-day granularity only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier assigned by storage at creation.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// Validation failure for task write inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only after trimming.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title cannot be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized field names follow the camelCase wire contract; `due_date` is
/// an ISO-8601 date string or null, timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable storage-assigned id.
    pub id: TaskId,
    /// Short summary line. Never blank for a stored task.
    pub title: String,
    /// Free-form details. Defaults to empty.
    pub description: String,
    /// Completion flag. Starts `false`.
    pub is_completed: bool,
    /// Optional calendar-day deadline.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp, set once by storage.
    pub created_at: DateTime<Utc>,
    /// Soft delete tombstone. `None` means active.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Returns whether this task should be considered visible/active.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Write input for task creation.
///
/// `is_completed` and the tombstone always start at their defaults, so they
/// are not part of the input. Absent and null `due_date` both mean "no due
/// date"; the tri-state distinction exists only on the patch path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Sparse field set for task updates.
///
/// Only present fields change the stored record. `due_date` is tri-state:
/// an absent key leaves the stored value untouched, JSON null (`Some(None)`)
/// clears it, and a date value (`Some(Some(d))`) replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Returns whether no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_completed.is_none()
            && self.due_date.is_none()
    }
}

/// Validates a candidate title, shared by create and update paths.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}

/// Deserializes a field where JSON null and an absent key must stay apart.
///
/// serde collapses both to `None` for a plain `Option`; wrapping the inner
/// value keeps null observable as `Some(None)` while `#[serde(default)]`
/// covers absent keys.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}
