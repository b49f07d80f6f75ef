use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::image_jobs::ImageJobError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Image job error: {0}")]
    ImageJob(#[from] ImageJobError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(err) => {
                tracing::error!("LLM error: {err}");
                (llm_status(err), "LLM_ERROR", err.to_string())
            }
            AppError::ImageJob(err) => {
                tracing::error!("Image job error: {err}");
                (image_job_status(err), "IMAGE_JOB_ERROR", err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Upstream statuses are relayed where the provider itself rejected the call;
/// everything else is a server-side 500.
fn llm_status(err: &LlmError) -> StatusCode {
    match err {
        LlmError::Api { status, .. } => relay_status(*status),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn image_job_status(err: &ImageJobError) -> StatusCode {
    match err {
        ImageJobError::Submission { status, .. } | ImageJobError::StatusCheck { status } => {
            relay_status(*status)
        }
        ImageJobError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn relay_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_request_timeout() {
        let status = image_job_status(&ImageJobError::Timeout { attempts: 30 });
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_provider_statuses_are_relayed() {
        let submission = ImageJobError::Submission {
            status: 402,
            message: "insufficient credits".to_string(),
        };
        assert_eq!(image_job_status(&submission), StatusCode::PAYMENT_REQUIRED);

        let check = ImageJobError::StatusCheck { status: 503 };
        assert_eq!(image_job_status(&check), StatusCode::SERVICE_UNAVAILABLE);

        let llm = LlmError::Api {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(llm_status(&llm), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_terminal_job_failures_are_internal() {
        for err in [
            ImageJobError::GenerationFailed("flagged".to_string()),
            ImageJobError::ResultParse("bad payload".to_string()),
        ] {
            assert_eq!(image_job_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
