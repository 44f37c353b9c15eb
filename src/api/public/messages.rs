//! Rewrite and analyze endpoint handlers

use axum::extract::State;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageRequest, MessageResponse};
use crate::domain::Mode;

/// POST /api/rewriteMessage
pub async fn rewrite_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    process(&state, request, Mode::Rewrite).await
}

/// POST /api/analyzeMessage
pub async fn analyze_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    process(&state, request, Mode::Analyze).await
}

async fn process(
    state: &AppState,
    request: MessageRequest,
    mode: Mode,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(mode = %mode, length = request.message.len(), "Processing message");

    let processed = state
        .message_service
        .process(&request.message, mode)
        .await?;

    info!(
        mode = %mode,
        cache_hit = processed.is_cache_hit(),
        entry_id = processed.entry_id().unwrap_or("-"),
        "Message processed"
    );

    Ok(Json(MessageResponse::from(processed)))
}
