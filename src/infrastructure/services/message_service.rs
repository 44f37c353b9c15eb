//! Cache-or-generate message flow
//!
//! Route, look up, generate, dedup-check, store. Cache failures degrade
//! the request to generation and never fail it; generation failures do.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::{
    AbRouter, CacheConfig, CacheStore, DomainError, EmbeddingProvider, GeneratedResponse,
    GenerationBackend, Mode, NewCacheEntry, ProcessedMessage, Route, SearchParams, StoreStatus,
};
use crate::infrastructure::observability::{
    record_cache_lookup, record_generation, record_store, LookupOutcome,
};

enum Lookup {
    Hit(ProcessedMessage),
    /// No usable entry; the query vector is kept for the store step
    Miss(Vec<f32>),
    Degraded,
}

/// Orchestrates one request across the router, cache store and generation backend
#[derive(Debug, Clone)]
pub struct MessageService {
    router: AbRouter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn CacheStore>,
    generator: Arc<dyn GenerationBackend>,
    config: CacheConfig,
}

impl MessageService {
    pub fn new(
        router: AbRouter,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn CacheStore>,
        generator: Arc<dyn GenerationBackend>,
        config: CacheConfig,
    ) -> Self {
        Self {
            router,
            embedder,
            store,
            generator,
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Process one message in `mode`
    pub async fn process(&self, message: &str, mode: Mode) -> Result<ProcessedMessage, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::validation("Message must not be empty"));
        }

        let route = self.router.route();
        debug!(mode = %mode, route = ?route, "Routing message");

        let mut lookup_vector = None;

        if route == Route::Cache {
            match self.lookup(message, mode).await {
                Lookup::Hit(processed) => return Ok(processed),
                Lookup::Miss(vector) => lookup_vector = Some(vector),
                Lookup::Degraded => {}
            }
        } else {
            record_cache_lookup(mode, LookupOutcome::Skipped);
        }

        let response = self.generate(message, mode).await?;
        let store = self.store_generation(message, mode, &response, lookup_vector).await;

        Ok(ProcessedMessage::generated(response, store))
    }

    async fn lookup(&self, message: &str, mode: Mode) -> Lookup {
        let params = SearchParams::new(mode, self.config.confidence_threshold);

        let attempt = async {
            let vector = self.embedder.embed(message).await.map_err(|e| {
                DomainError::cache_unavailable(format!("Embedding failed: {}", e))
            })?;
            let hit = self.store.find_similar(&vector, &params).await?;
            Ok::<_, DomainError>((vector, hit))
        };

        let (vector, hit) = match timeout(self.config.cache_timeout(), attempt).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                warn!(mode = %mode, error = %e, "Cache lookup failed, falling back to generation");
                record_cache_lookup(mode, LookupOutcome::Degraded);
                return Lookup::Degraded;
            }
            Err(_) => {
                warn!(
                    mode = %mode,
                    timeout = ?self.config.cache_timeout(),
                    "Cache lookup timed out, falling back to generation"
                );
                record_cache_lookup(mode, LookupOutcome::Degraded);
                return Lookup::Degraded;
            }
        };

        let Some(hit) = hit else {
            debug!(mode = %mode, "Cache miss");
            record_cache_lookup(mode, LookupOutcome::Miss);
            return Lookup::Miss(vector);
        };

        let entry_id = hit.entry.id().to_string();

        match hit.entry.into_response().validate_for(mode) {
            Ok(response) => {
                info!(mode = %mode, entry_id = %entry_id, similarity = hit.similarity, "Cache hit");
                record_cache_lookup(mode, LookupOutcome::Hit);
                Lookup::Hit(ProcessedMessage::from_cache(response, entry_id, hit.similarity))
            }
            Err(e) => {
                warn!(entry_id = %entry_id, error = %e, "Evicting cached entry with invalid payload");
                self.evict_invalid(&entry_id).await;
                record_cache_lookup(mode, LookupOutcome::Miss);
                Lookup::Miss(vector)
            }
        }
    }

    /// Delete an entry whose payload no longer validates for its mode
    async fn evict_invalid(&self, entry_id: &str) {
        match timeout(self.config.cache_timeout(), self.store.delete(entry_id)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(entry_id = %entry_id, error = %e, "Failed to evict invalid entry"),
            Err(_) => warn!(entry_id = %entry_id, "Evicting invalid entry timed out"),
        }
    }

    async fn generate(&self, message: &str, mode: Mode) -> Result<GeneratedResponse, DomainError> {
        let started = Instant::now();
        let limit = self.config.generation_timeout();

        let result = match timeout(limit, self.generator.generate(message, mode)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::generation(format!(
                "{} backend timed out after {:?}",
                self.generator.backend_name(),
                limit
            ))),
        }
        .and_then(|response| response.validate_for(mode));

        record_generation(mode, result.is_ok(), started.elapsed());

        if let Err(e) = &result {
            warn!(mode = %mode, backend = self.generator.backend_name(), error = %e, "Generation failed");
        }

        result
    }

    async fn store_generation(
        &self,
        message: &str,
        mode: Mode,
        response: &GeneratedResponse,
        vector: Option<Vec<f32>>,
    ) -> StoreStatus {
        let status = match timeout(
            self.config.cache_timeout(),
            self.try_store(message, mode, response, vector),
        )
        .await
        {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                warn!(mode = %mode, error = %e, "Storing generation failed");
                StoreStatus::Failed
            }
            Err(_) => {
                warn!(mode = %mode, "Storing generation timed out");
                StoreStatus::Failed
            }
        };

        let label = match &status {
            StoreStatus::Stored { entry_id } => {
                info!(mode = %mode, entry_id = %entry_id, "Stored new cache entry");
                "stored"
            }
            StoreStatus::SimilarExists { entry_id, similarity } => {
                info!(
                    mode = %mode,
                    entry_id = %entry_id,
                    similarity = *similarity,
                    "Similar entry exists, skipping store"
                );
                "similar_exists"
            }
            StoreStatus::Failed => "failed",
        };
        record_store(mode, label);

        status
    }

    /// A failed dedup search aborts before create
    async fn try_store(
        &self,
        message: &str,
        mode: Mode,
        response: &GeneratedResponse,
        vector: Option<Vec<f32>>,
    ) -> Result<StoreStatus, DomainError> {
        let vector = match vector {
            Some(vector) => vector,
            None => self.embedder.embed(message).await?,
        };

        let params = SearchParams::new(mode, self.config.dedup_threshold);

        if let Some(existing) = self.store.find_similar(&vector, &params).await? {
            return Ok(StoreStatus::SimilarExists {
                entry_id: existing.entry.id().to_string(),
                similarity: existing.similarity,
            });
        }

        let entry_id = self
            .store
            .create(NewCacheEntry::new(message, mode, response.clone(), vector))
            .await?;

        Ok(StoreStatus::Stored { entry_id })
    }
}
