//! Cache administration handlers

use axum::extract::{Query, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CacheStatsResponse, ClearCacheQuery, ClearCacheResponse, Json};
use crate::domain::Mode;

/// GET /admin/cache/stats
pub async fn cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let analyze = state.cache_store.count(Some(Mode::Analyze)).await?;
    let rewrite = state.cache_store.count(Some(Mode::Rewrite)).await?;

    Ok(Json(CacheStatsResponse {
        total: analyze + rewrite,
        analyze,
        rewrite,
    }))
}

/// DELETE /admin/cache?mode=analyze|rewrite
///
/// Without a mode every entry is removed.
pub async fn clear_cache(
    State(state): State<AppState>,
    Query(query): Query<ClearCacheQuery>,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let mode = query
        .mode()
        .map_err(|e| ApiError::from(e).with_param("mode"))?;

    let deleted = state.cache_store.clear(mode).await?;
    info!(deleted, mode = ?mode, "Cleared cache entries");

    Ok(Json(ClearCacheResponse { deleted, mode }))
}
