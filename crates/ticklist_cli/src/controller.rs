//! Client-side task list state and sync.
//!
//! # Responsibility
//! - Hold the local task list between server round trips.
//! - Apply optimistic mutations and reconcile failures by re-fetching.
//!
//! # Invariants
//! - Every failed mutation triggers a refresh; local state never drifts
//!   silently from the server.
//! - A committed outcome carries the record the server stored, not the
//!   optimistic copy.

use log::{error, warn};
use ticklist_core::{NewTask, Task, TaskId, TaskPatch};

use crate::api::{ApiError, TasksApi};
use chrono::NaiveDate;

/// Local mirror of the server task list.
#[derive(Debug, Default)]
pub struct TaskListState {
    tasks: Vec<Task>,
}

impl TaskListState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    fn replace_task(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|current| current.id == task.id) {
            *slot = task;
        }
    }

    fn apply_patch(&mut self, id: TaskId, patch: &TaskPatch) {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return;
        };

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
    }

    fn remove(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
    }
}

/// Result of one optimistic mutation after reconciliation.
#[derive(Debug)]
pub enum MutationOutcome {
    /// Server committed; local state holds the authoritative record.
    Committed(Task),
    /// Server rejected or never answered; local state was re-fetched.
    Failed(ApiError),
}

/// Editable fields captured by the add and edit commands.
///
/// Mirrors the edit form: submitting always carries all three fields, so a
/// cleared due date reaches the server as an explicit null.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

/// Drives the local list against the server API.
pub struct TaskListController<A: TasksApi> {
    api: A,
    state: TaskListState,
}

impl<A: TasksApi> TaskListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: TaskListState::default(),
        }
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Replaces local state with the server's task list.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let tasks = self.api.list_tasks()?;
        self.state.replace_all(tasks);
        Ok(())
    }

    /// Creates a task, then refreshes so the new row carries its
    /// server-assigned id and creation time.
    pub fn create(&mut self, input: NewTask) -> MutationOutcome {
        match self.api.create_task(&input) {
            Ok(task) => {
                if let Err(err) = self.refresh() {
                    return self.recover("task_create", err);
                }
                MutationOutcome::Committed(task)
            }
            Err(err) => self.recover("task_create", err),
        }
    }

    /// Applies a patch optimistically, then reconciles with the server.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> MutationOutcome {
        self.state.apply_patch(id, &patch);
        match self.api.update_task(id, &patch) {
            Ok(task) => {
                self.state.replace_task(task.clone());
                MutationOutcome::Committed(task)
            }
            Err(err) => self.recover("task_update", err),
        }
    }

    /// Flips completion for one known task; `None` when the id is not in
    /// local state.
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<MutationOutcome> {
        let target = self.state.find(id)?;
        let patch = TaskPatch {
            is_completed: Some(!target.is_completed),
            ..TaskPatch::default()
        };
        Some(self.update(id, patch))
    }

    /// Drops a task optimistically, then soft-deletes it on the server.
    pub fn remove(&mut self, id: TaskId) -> MutationOutcome {
        self.state.remove(id);
        match self.api.delete_task(id) {
            Ok(task) => MutationOutcome::Committed(task),
            Err(err) => self.recover("task_delete", err),
        }
    }

    /// Submits an add/edit form: create when `editing` is empty, patch the
    /// named task otherwise.
    pub fn submit(&mut self, form: TaskForm, editing: Option<TaskId>) -> MutationOutcome {
        match editing {
            None => self.create(NewTask {
                title: form.title,
                description: if form.description.is_empty() {
                    None
                } else {
                    Some(form.description)
                },
                due_date: form.due_date,
            }),
            Some(id) => {
                let patch = TaskPatch {
                    title: Some(form.title),
                    description: Some(form.description),
                    is_completed: None,
                    due_date: Some(form.due_date),
                };
                self.update(id, patch)
            }
        }
    }

    // Failed mutations re-fetch authoritative state instead of trusting the
    // optimistic copy.
    fn recover(&mut self, operation: &'static str, err: ApiError) -> MutationOutcome {
        error!("event=sync_failed module=cli operation={operation} error={err}");
        if let Err(refresh_err) = self.refresh() {
            warn!(
                "event=sync_refresh_failed module=cli operation={operation} error={refresh_err}"
            );
        }
        MutationOutcome::Failed(err)
    }
}
