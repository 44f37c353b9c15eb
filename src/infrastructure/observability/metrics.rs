//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsConfig;
use crate::domain::Mode;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("empathy_gateway_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Outcome of the cache lookup step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Miss,
    Skipped,
    Degraded,
}

impl LookupOutcome {
    fn as_str(self) -> &'static str {
        match self {
            LookupOutcome::Hit => "hit",
            LookupOutcome::Miss => "miss",
            LookupOutcome::Skipped => "skipped",
            LookupOutcome::Degraded => "degraded",
        }
    }
}

pub fn record_cache_lookup(mode: Mode, outcome: LookupOutcome) {
    counter!(
        "cache_lookups_total",
        "mode" => mode.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_generation(mode: Mode, success: bool, duration: Duration) {
    let labels = [
        ("mode", mode.as_str()),
        ("status", if success { "success" } else { "error" }),
    ];

    counter!("generations_total", &labels).increment(1);
    histogram!("generation_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// `status` is one of `stored`, `similar_exists`, `failed`
pub fn record_store(mode: Mode, status: &'static str) {
    counter!("cache_stores_total", "mode" => mode.as_str(), "status" => status).increment(1);
}

/// `outcome` is one of `updated`, `evicted`, `not_found`, `error`
pub fn record_feedback(liked: bool, outcome: &'static str) {
    counter!(
        "feedback_total",
        "liked" => if liked { "true" } else { "false" },
        "outcome" => outcome
    )
    .increment(1);
}
