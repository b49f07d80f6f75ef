//! Image generation via the kie.ai asynchronous job API.
//!
//! ARCHITECTURAL RULE: No other module may call the image provider directly.
//! All image generation MUST go through [`ImageJobClient`].
//!
//! One call to [`ImageJobClient::generate`] covers the whole job lifecycle:
//! submit the prompt as a new task, then poll the status endpoint until the
//! provider reports success or failure, or the attempt budget runs out. No
//! individual call is ever retried; the only resilience is the poll loop
//! itself, which waits for a state the provider advances on its own.

pub mod protocol;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use protocol::{
    ApiErrorBody, CreateTaskRequest, CreateTaskResponse, JobState, RecordInfoResponse,
    ResultPayload, TaskInput, IMAGE_MODEL,
};
use transport::{ApiReply, HttpJobTransport, JobTransport, TransportError};

/// Maximum number of status checks for one job.
pub const MAX_POLL_ATTEMPTS: u32 = 30;
/// Fixed wait before every status check, including the first.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Surfaced when the provider reports failure without giving a reason.
const GENERIC_FAILURE_MESSAGE: &str = "Image generation failed";

#[derive(Debug, Error)]
pub enum ImageJobError {
    /// A call never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The job-creation call returned a non-success status.
    #[error("submission failed (status {status}): {message}")]
    Submission { status: u16, message: String },

    /// A status check returned a non-success status.
    #[error("status check failed (status {status})")]
    StatusCheck { status: u16 },

    /// The provider reported the job as failed.
    #[error("{0}")]
    GenerationFailed(String),

    /// A success response carried a body or result payload we could not read.
    #[error("result parse error: {0}")]
    ResultParse(String),

    /// The job never reached a terminal state within the attempt budget.
    #[error("image generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },
}

/// Attempt budget and delay for one poll loop.
///
/// [`PollPolicy::default`] is the production policy (30 attempts at 2 s, a
/// 60 s ceiling from the first poll); tests shrink it to exercise boundary
/// attempt counts.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS,
            interval: POLL_INTERVAL,
        }
    }
}

/// Client for the provider's asynchronous image-job API.
///
/// Holds no per-job state: concurrent calls each own their task id and
/// attempt count, so invocations never interfere with one another.
#[derive(Clone)]
pub struct ImageJobClient {
    transport: Arc<dyn JobTransport>,
    policy: PollPolicy,
}

impl ImageJobClient {
    /// Production client talking to the real provider.
    pub fn new(api_key: String) -> Self {
        Self::with_transport(Arc::new(HttpJobTransport::new(api_key)))
    }

    /// Client over a custom transport with the production poll policy.
    pub fn with_transport(transport: Arc<dyn JobTransport>) -> Self {
        Self::with_policy(transport, PollPolicy::default())
    }

    /// Client with full control over transport and poll policy.
    pub fn with_policy(transport: Arc<dyn JobTransport>, policy: PollPolicy) -> Self {
        Self { transport, policy }
    }

    /// Generates one image and returns its URL.
    ///
    /// Every failure is terminal. A caller wanting another attempt re-invokes
    /// the whole operation, which creates a fresh job.
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<String, ImageJobError> {
        let task_id = self.submit(prompt, aspect_ratio).await?;
        debug!("Image task {task_id} created");
        self.poll(&task_id).await
    }

    async fn submit(&self, prompt: &str, aspect_ratio: &str) -> Result<String, ImageJobError> {
        let request = CreateTaskRequest {
            model: IMAGE_MODEL,
            input: TaskInput {
                prompt,
                aspect_ratio,
            },
        };

        let reply = self.transport.create_task(&request).await?;

        if !reply.is_success() {
            warn!(
                "Image task creation returned {}: {}",
                reply.status, reply.body
            );
            return Err(ImageJobError::Submission {
                status: reply.status,
                message: submission_error_message(&reply),
            });
        }

        let response: CreateTaskResponse = serde_json::from_str(&reply.body).map_err(|e| {
            ImageJobError::ResultParse(format!("malformed createTask response: {e}"))
        })?;

        Ok(response.data.task_id)
    }

    async fn poll(&self, task_id: &str) -> Result<String, ImageJobError> {
        for attempt in 1..=self.policy.max_attempts {
            // The delay comes before every check, including the first: the
            // provider never has a result immediately after submission.
            tokio::time::sleep(self.policy.interval).await;

            let reply = self.transport.record_info(task_id).await?;

            if !reply.is_success() {
                warn!("Status check for task {task_id} returned {}", reply.status);
                return Err(ImageJobError::StatusCheck {
                    status: reply.status,
                });
            }

            let response: RecordInfoResponse = serde_json::from_str(&reply.body).map_err(|e| {
                ImageJobError::ResultParse(format!("malformed recordInfo response: {e}"))
            })?;

            match response.data.into_job_state() {
                JobState::Pending => {
                    debug!(
                        "Task {task_id} still pending (attempt {attempt}/{})",
                        self.policy.max_attempts
                    );
                }
                JobState::Success { result_json } => return extract_result_url(&result_json),
                JobState::Failed { message } => {
                    return Err(ImageJobError::GenerationFailed(
                        message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                    ));
                }
            }
        }

        Err(ImageJobError::Timeout {
            attempts: self.policy.max_attempts,
        })
    }
}

/// Best-effort extraction of the provider's error message from a failed
/// submission reply. Falls back to a message built from the HTTP status when
/// the body is not the expected JSON shape.
fn submission_error_message(reply: &ApiReply) -> String {
    if let Some(msg) = serde_json::from_str::<ApiErrorBody>(&reply.body)
        .ok()
        .and_then(|body| body.msg)
    {
        return msg;
    }

    let reason = reqwest::StatusCode::from_u16(reply.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Error");
    format!("API error {}: {reason}", reply.status)
}

/// Parses the stringified `resultJson` document and returns the first result
/// URL. Only ever called once the provider has reported success.
fn extract_result_url(result_json: &str) -> Result<String, ImageJobError> {
    let payload: ResultPayload = serde_json::from_str(result_json)
        .map_err(|e| ImageJobError::ResultParse(format!("malformed resultJson: {e}")))?;

    payload
        .result_urls
        .into_iter()
        .next()
        .ok_or_else(|| ImageJobError::ResultParse("resultJson contained no result URLs".to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::protocol::CreateTaskRequest;
    use super::transport::{ApiReply, JobTransport, TransportError};

    /// Scripted transport: one submission outcome, then a queue of poll
    /// outcomes consumed in order. Panics if the poller makes a call the
    /// script does not cover, which doubles as a "no extra attempts" check.
    pub struct MockTransport {
        submit: Mutex<Option<Result<ApiReply, TransportError>>>,
        polls: Mutex<VecDeque<Result<ApiReply, TransportError>>>,
        pub submit_calls: AtomicU32,
        pub poll_calls: AtomicU32,
    }

    impl MockTransport {
        pub fn new(
            submit: Result<ApiReply, TransportError>,
            polls: Vec<Result<ApiReply, TransportError>>,
        ) -> Self {
            Self {
                submit: Mutex::new(Some(submit)),
                polls: Mutex::new(polls.into_iter().collect()),
                submit_calls: AtomicU32::new(0),
                poll_calls: AtomicU32::new(0),
            }
        }

        /// A transport that panics on any call; for paths that must never
        /// reach the provider.
        pub fn untouched() -> Self {
            Self {
                submit: Mutex::new(None),
                polls: Mutex::new(VecDeque::new()),
                submit_calls: AtomicU32::new(0),
                poll_calls: AtomicU32::new(0),
            }
        }

        pub fn submitted(task_id: &str) -> Result<ApiReply, TransportError> {
            Ok(reply(
                200,
                serde_json::json!({ "code": 200, "data": { "taskId": task_id } }).to_string(),
            ))
        }

        pub fn pending() -> Result<ApiReply, TransportError> {
            Ok(reply(
                200,
                serde_json::json!({ "code": 200, "data": { "state": "pending" } }).to_string(),
            ))
        }

        pub fn success(result_json: &str) -> Result<ApiReply, TransportError> {
            Ok(reply(
                200,
                serde_json::json!({
                    "code": 200,
                    "data": { "state": "success", "resultJson": result_json }
                })
                .to_string(),
            ))
        }

        pub fn failed(fail_msg: Option<&str>) -> Result<ApiReply, TransportError> {
            Ok(reply(
                200,
                serde_json::json!({
                    "code": 200,
                    "data": { "state": "fail", "failMsg": fail_msg }
                })
                .to_string(),
            ))
        }
    }

    pub fn reply(status: u16, body: impl Into<String>) -> ApiReply {
        ApiReply {
            status,
            body: body.into(),
        }
    }

    #[async_trait]
    impl JobTransport for MockTransport {
        async fn create_task(
            &self,
            _request: &CreateTaskRequest<'_>,
        ) -> Result<ApiReply, TransportError> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            self.submit
                .lock()
                .unwrap()
                .take()
                .expect("submission call beyond the scripted sequence")
        }

        async fn record_info(&self, _task_id: &str) -> Result<ApiReply, TransportError> {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .expect("status check made after the scripted sequence ended")
        }
    }
}
