//! Result of processing one message through the cache-or-generate flow

use serde::Serialize;

use super::GeneratedResponse;

/// What happened to a fresh generation at the store step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoreStatus {
    /// A new cache entry was created
    Stored { entry_id: String },
    /// A near-duplicate already exists; it stays the system of record
    SimilarExists { entry_id: String, similarity: f32 },
    /// Storing failed; the response was delivered without a persisted id
    Failed,
}

/// Where the response came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResponseOrigin {
    /// Served from a cached entry
    Cache { entry_id: String, similarity: f32 },
    /// Produced by the generation backend
    Generation { store: StoreStatus },
}

/// Response to a processed message, with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedMessage {
    pub response: GeneratedResponse,
    pub origin: ResponseOrigin,
}

impl ProcessedMessage {
    pub fn from_cache(
        response: GeneratedResponse,
        entry_id: impl Into<String>,
        similarity: f32,
    ) -> Self {
        Self {
            response,
            origin: ResponseOrigin::Cache {
                entry_id: entry_id.into(),
                similarity,
            },
        }
    }

    pub fn generated(response: GeneratedResponse, store: StoreStatus) -> Self {
        Self {
            response,
            origin: ResponseOrigin::Generation { store },
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self.origin, ResponseOrigin::Cache { .. })
    }

    /// The entry that feedback for this response should target, if any.
    ///
    /// For a `similar_exists` result this is the existing entry.
    pub fn entry_id(&self) -> Option<&str> {
        match &self.origin {
            ResponseOrigin::Cache { entry_id, .. } => Some(entry_id),
            ResponseOrigin::Generation { store } => match store {
                StoreStatus::Stored { entry_id } => Some(entry_id),
                StoreStatus::SimilarExists { entry_id, .. } => Some(entry_id),
                StoreStatus::Failed => None,
            },
        }
    }

    pub fn similarity(&self) -> Option<f32> {
        match &self.origin {
            ResponseOrigin::Cache { similarity, .. } => Some(*similarity),
            ResponseOrigin::Generation {
                store: StoreStatus::SimilarExists { similarity, .. },
            } => Some(*similarity),
            ResponseOrigin::Generation { .. } => None,
        }
    }

    pub fn store_status(&self) -> Option<&StoreStatus> {
        match &self.origin {
            ResponseOrigin::Cache { .. } => None,
            ResponseOrigin::Generation { store } => Some(store),
        }
    }
}
