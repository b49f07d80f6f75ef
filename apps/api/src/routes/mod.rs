pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/generate-post", post(handlers::handle_generate_post))
        .route("/api/generate-image", post(handlers::handle_generate_image))
        .with_state(state)
}
