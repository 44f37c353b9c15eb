//! Feedback endpoint handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, FeedbackRequest, FeedbackResponse, Json};

/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let message_id = request.message_id.trim();
    if message_id.is_empty() {
        return Err(ApiError::bad_request("message_id must not be empty").with_param("message_id"));
    }

    let outcome = state
        .feedback_service
        .apply_feedback(message_id, request.liked)
        .await?;

    let response = FeedbackResponse::from(outcome);
    info!(
        entry_id = %message_id,
        liked = request.liked,
        rating = ?response.rating(),
        "Feedback applied"
    );

    Ok(Json(response))
}
