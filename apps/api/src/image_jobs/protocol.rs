//! Wire types for the kie.ai job API.
//!
//! Two endpoints are involved: `createTask` submits a generation job and
//! returns an opaque task id; `recordInfo` reports the job's state. A
//! successful record carries the result as a *stringified* JSON document in
//! `resultJson`, which callers parse separately.

use serde::{Deserialize, Serialize};

/// The image model requested for every task.
/// Intentionally hardcoded to prevent accidental drift.
pub const IMAGE_MODEL: &str = "z-image";

/// Body of a `POST /api/v1/jobs/createTask` request.
#[derive(Debug, Serialize)]
pub struct CreateTaskRequest<'a> {
    pub model: &'a str,
    pub input: TaskInput<'a>,
}

/// Generation parameters nested under `input`.
#[derive(Debug, Serialize)]
pub struct TaskInput<'a> {
    pub prompt: &'a str,
    pub aspect_ratio: &'a str,
}

/// Successful `createTask` response body.
#[derive(Debug, Deserialize)]
pub struct CreateTaskResponse {
    pub data: CreateTaskData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskData {
    /// Server-assigned identifier for the queued job.
    pub task_id: String,
}

/// Successful `recordInfo` response body.
#[derive(Debug, Deserialize)]
pub struct RecordInfoResponse {
    pub data: RecordInfoData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfoData {
    /// Discriminator: `pending`, `success`, or `fail`.
    #[serde(default)]
    pub state: String,
    /// Stringified JSON result document, present on success.
    #[serde(default)]
    pub result_json: Option<String>,
    /// Provider failure reason, sometimes present on `fail`.
    #[serde(default)]
    pub fail_msg: Option<String>,
}

/// Error body the provider returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
}

/// The embedded result document inside `resultJson`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    #[serde(default)]
    pub result_urls: Vec<String>,
}

/// Client-side view of the provider's job state machine.
///
/// The provider only ever advances a job to `success` or `fail`; every other
/// discriminator value (including ones this client has never seen) means the
/// job is still in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Success { result_json: String },
    Failed { message: Option<String> },
}

impl RecordInfoData {
    /// Maps the wire record onto [`JobState`].
    pub fn into_job_state(self) -> JobState {
        match self.state.as_str() {
            "success" => JobState::Success {
                result_json: self.result_json.unwrap_or_default(),
            },
            "fail" => JobState::Failed {
                message: self.fail_msg,
            },
            _ => JobState::Pending,
        }
    }
}
