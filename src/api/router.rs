use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::admin;
use super::health;
use super::public;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Message and feedback API
        .nest("/api", public::create_public_router())
        // Admin API
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Create the served router: application routes, optional metrics route and CORS
pub fn create_router(
    state: AppState,
    metrics: Option<(PrometheusMetrics, String)>,
    cors_origins: &[String],
) -> Router {
    let mut router = create_router_with_state(state);

    if let Some((metrics, path)) = metrics {
        router = router.merge(create_metrics_router(metrics, &path));
    }

    router.layer(cors_layer(cors_origins))
}

/// An empty origin list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(parsed)
}
