//! Transport seam between the poller and the provider's HTTP API.
//!
//! The poller only cares about two things per call: did an HTTP response come
//! back at all, and what were its status and body. [`JobTransport`] captures
//! exactly that, so tests can script replies without a network.

use async_trait::async_trait;

use crate::image_jobs::protocol::CreateTaskRequest;

const KIE_API_URL: &str = "https://api.kie.ai";

/// Raw reply from one provider call: the HTTP status plus the body text.
#[derive(Debug)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response (DNS, connect, TLS, or a
/// failure while reading the body).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One provider call per method; no interpretation of the reply beyond
/// reading it off the wire.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// `POST /api/v1/jobs/createTask`
    async fn create_task(&self, request: &CreateTaskRequest<'_>)
        -> Result<ApiReply, TransportError>;

    /// `GET /api/v1/jobs/recordInfo?taskId={task_id}`
    async fn record_info(&self, task_id: &str) -> Result<ApiReply, TransportError>;
}

/// Production transport backed by [`reqwest`] with bearer authentication.
pub struct HttpJobTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpJobTransport {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(KIE_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn into_reply(response: reqwest::Response) -> Result<ApiReply, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(ApiReply { status, body })
    }
}

#[async_trait]
impl JobTransport for HttpJobTransport {
    async fn create_task(
        &self,
        request: &CreateTaskRequest<'_>,
    ) -> Result<ApiReply, TransportError> {
        let response = self
            .client
            .post(format!("{}/api/v1/jobs/createTask", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Self::into_reply(response).await
    }

    async fn record_info(&self, task_id: &str) -> Result<ApiReply, TransportError> {
        let response = self
            .client
            .get(format!("{}/api/v1/jobs/recordInfo", self.base_url))
            .query(&[("taskId", task_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Self::into_reply(response).await
    }
}
