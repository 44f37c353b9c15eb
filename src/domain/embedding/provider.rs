//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Maps text to a fixed-dimension vector (OpenAI, local models, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model used for embeddings
    fn model(&self) -> &str;

    /// Dimension of every vector this provider returns
    fn dimensions(&self) -> usize;
}
