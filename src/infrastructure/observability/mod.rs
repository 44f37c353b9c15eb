//! Observability infrastructure - Metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_feedback,
    record_generation, record_store, LookupOutcome, PrometheusMetrics,
};
