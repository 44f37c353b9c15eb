//! Admin API endpoints for managing the cache store

pub mod cache;

use axum::{
    routing::{delete, get},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache", delete(cache::clear_cache))
}
