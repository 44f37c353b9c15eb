//! Embedding provider domain models and traits

mod provider;
mod similarity;

pub use provider::EmbeddingProvider;
pub use similarity::{cosine_similarity, similarity_score};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
