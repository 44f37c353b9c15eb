//! Empathy Gateway
//!
//! Rewrites messages in a more empathetic tone and analyzes them across four
//! emotional-intelligence categories, with:
//! - A/B routing between a semantic cache and fresh generation
//! - A mode-partitioned vector cache with near-duplicate suppression
//! - Like/dislike feedback that ranks and evicts cached entries

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{AbRouter, EmbeddingProvider, GenerationBackend, LlmProvider};
use infrastructure::{
    cache_store::create_cache_store,
    embedding::OpenAiEmbeddingProvider,
    generation::LlmGenerationBackend,
    http::HttpClient,
    llm::OpenAiProvider,
    services::{FeedbackService, MessageService},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let api_key = config.openai.resolved_api_key().unwrap_or_else(|| {
        warn!("No OpenAI API key configured; generation and embedding calls will be rejected");
        String::new()
    });
    let client = HttpClient::with_timeout(Duration::from_secs(config.openai.timeout_secs))?;

    let llm_provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        client.clone(),
        api_key.clone(),
        config.openai.base_url.clone(),
    ));
    let generator: Arc<dyn GenerationBackend> = Arc::new(
        LlmGenerationBackend::new(llm_provider)
            .with_model(config.openai.model.clone())
            .with_temperature(config.openai.temperature)
            .with_max_tokens(config.openai.max_tokens),
    );

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::with_base_url(client, api_key, config.openai.base_url.clone())
            .with_model(config.openai.embedding_model.clone()),
    );

    let cache_store = create_cache_store(&config.vector_store).await?;
    let router = AbRouter::with_thread_rng(config.ab_test.clone());

    info!(
        cache_weight = config.ab_test.cache_weight,
        generation_weight = config.ab_test.generation_weight,
        confidence_threshold = config.cache.confidence_threshold,
        dedup_threshold = config.cache.dedup_threshold,
        model = %config.openai.model,
        "Message pipeline configured"
    );

    let message_service = MessageService::new(
        router,
        embedder,
        cache_store.clone(),
        generator,
        config.cache.clone(),
    );
    let feedback_service = FeedbackService::new(cache_store.clone());

    Ok(AppState::new(message_service, feedback_service, cache_store))
}
