//! Cache store backends

mod in_memory;
mod weaviate;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

pub use in_memory::InMemoryCacheStore;
pub use weaviate::WeaviateCacheStore;

use crate::config::{VectorStoreBackend, VectorStoreConfig};
use crate::domain::{CacheStore, DomainError};
use crate::infrastructure::http::HttpClient;

/// Build the configured backend.
///
/// An unreachable Weaviate at startup is logged and tolerated. The schema
/// check is retried on the next search or create, and the message flow
/// degrades to generation until it succeeds.
pub async fn create_cache_store(
    config: &VectorStoreConfig,
) -> Result<Arc<dyn CacheStore>, DomainError> {
    match config.backend {
        VectorStoreBackend::InMemory => {
            info!("Using in-memory cache store");
            Ok(Arc::new(InMemoryCacheStore::new()))
        }
        VectorStoreBackend::Weaviate => {
            let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
            let mut store = WeaviateCacheStore::new(client, &config.url, &config.class_name);

            if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
                store = store.with_api_key(api_key);
            }

            if let Err(e) = store.ensure_schema().await {
                warn!(url = %config.url, error = %e, "Weaviate schema check failed, will retry on first use");
            }

            info!(url = %config.url, class = %config.class_name, "Using Weaviate cache store");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_backend_is_in_memory() {
        let store = create_cache_store(&VectorStoreConfig::default()).await.unwrap();
        assert!(store.health_check().await.is_ok());
        assert_eq!(store.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_weaviate_still_builds() {
        let config = VectorStoreConfig {
            backend: VectorStoreBackend::Weaviate,
            url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..VectorStoreConfig::default()
        };

        let store = create_cache_store(&config).await.unwrap();
        assert!(store.health_check().await.is_err());
    }
}
