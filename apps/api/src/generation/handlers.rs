//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::{post_user_prompt, POST_SYSTEM_PROMPT};
use crate::state::AppState;

/// Aspect ratio requested for every generated image. Wide images sit well in
/// the LinkedIn feed.
const IMAGE_ASPECT_RATIO: &str = "16:9";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePostResponse {
    pub post: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-post
///
/// One synchronous chat-completion call with the fixed persona prompt.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    Json(request): Json<GeneratePostRequest>,
) -> Result<Json<GeneratePostResponse>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let post = state
        .llm
        .generate_text(&post_user_prompt(&request.topic), POST_SYSTEM_PROMPT)
        .await?;

    Ok(Json(GeneratePostResponse { post }))
}

/// POST /api/generate-image
///
/// Submits an asynchronous image job and waits for it to complete (or fail,
/// or time out) before responding.
pub async fn handle_generate_image(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let image_url = state
        .images
        .generate(&request.prompt, IMAGE_ASPECT_RATIO)
        .await?;

    Ok(Json(GenerateImageResponse { image_url }))
}
