//! Caller-facing message and feedback endpoints

pub mod feedback;
pub mod messages;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create the `/api` router
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/rewriteMessage", post(messages::rewrite_message))
        .route("/analyzeMessage", post(messages::analyze_message))
        .route("/feedback", post(feedback::submit_feedback))
}
