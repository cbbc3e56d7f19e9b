//! HTTP client for the ticklist server.
//!
//! # Responsibility
//! - Speak the server's JSON wire contract from the terminal client.
//! - Normalize transport, status, and decode failures into one error type.
//!
//! # Invariants
//! - Every mutation returns the full record the server committed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::Deserialize;
use ticklist_core::{NewTask, Task, TaskId, TaskPatch};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client-side API failure.
#[derive(Debug)]
pub enum ApiError {
    /// Server answered with a non-success status.
    Http { status: u16, message: String },
    /// Request never produced a response.
    Transport(String),
    /// Response body did not match the wire contract.
    Decode(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { status, message } => write!(f, "server error {status}: {message}"),
            Self::Transport(details) => write!(f, "request failed: {details}"),
            Self::Decode(details) => write!(f, "unexpected server response: {details}"),
        }
    }
}

impl Error for ApiError {}

/// Wire operations the terminal client needs.
pub trait TasksApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    fn create_task(&self, input: &NewTask) -> Result<Task, ApiError>;
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;
    fn delete_task(&self, id: TaskId) -> Result<Task, ApiError>;
}

/// ureq-backed client against a running ticklist server.
pub struct HttpTasksApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTasksApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }
}

impl TasksApi for HttpTasksApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .agent
            .get(&self.tasks_url())
            .call()
            .map_err(request_error)?;
        decode(response)
    }

    fn create_task(&self, input: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .agent
            .post(&self.tasks_url())
            .send_json(input)
            .map_err(request_error)?;
        decode(response)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self
            .agent
            .put(&self.task_url(id))
            .send_json(patch)
            .map_err(request_error)?;
        decode(response)
    }

    fn delete_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let response = self
            .agent
            .delete(&self.task_url(id))
            .call()
            .map_err(request_error)?;
        decode(response)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

fn request_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<ErrorEnvelope>()
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("status {status} without error body"));
            ApiError::Http { status, message }
        }
        other => ApiError::Transport(other.to_string()),
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    response
        .into_json()
        .map_err(|err| ApiError::Decode(err.to_string()))
}
