//! Cache store trait and search types

use std::fmt::Debug;

use async_trait::async_trait;

use super::{CacheEntry, EntryUpdate, NewCacheEntry};
use crate::domain::{DomainError, Mode};

/// A cache entry that cleared the similarity threshold of a search
#[derive(Debug, Clone)]
pub struct RetrievalHit {
    /// The matching entry
    pub entry: CacheEntry,
    /// Similarity score (0.0 to 1.0), higher is more similar
    pub similarity: f32,
}

impl RetrievalHit {
    pub fn new(entry: CacheEntry, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// Search parameters for a nearest-neighbour lookup
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Only entries of this mode are considered
    pub mode: Mode,
    /// Minimum similarity, inclusive
    pub min_similarity: f32,
    /// Maximum results to return
    pub limit: usize,
}

impl SearchParams {
    /// Create search params returning at most one hit
    pub fn new(mode: Mode, min_similarity: f32) -> Self {
        Self {
            mode,
            min_similarity,
            limit: 1,
        }
    }

    /// Set result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether a score clears the threshold. Exactly the threshold counts.
    pub fn accepts(&self, similarity: f32) -> bool {
        similarity >= self.min_similarity
    }
}

/// Mode-scoped nearest-neighbour store of cache entries.
///
/// Backend connectivity failures are reported as
/// [`DomainError::CacheUnavailable`], never as an empty result.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Entries of `params.mode` with similarity `>= params.min_similarity`,
    /// most similar first, truncated to `params.limit`
    async fn search(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<RetrievalHit>, DomainError>;

    /// Insert an entry unconditionally and return its new id
    async fn create(&self, entry: NewCacheEntry) -> Result<String, DomainError>;

    /// Get an entry by id
    async fn get(&self, id: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Partially update an entry, `NotFound` if it does not exist
    async fn update(&self, id: &str, update: EntryUpdate) -> Result<(), DomainError>;

    /// Delete an entry, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Delete all entries, or all entries of one mode
    async fn clear(&self, mode: Option<Mode>) -> Result<usize, DomainError>;

    /// Number of entries, optionally restricted to one mode
    async fn count(&self, mode: Option<Mode>) -> Result<usize, DomainError>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<(), DomainError>;

    /// Best match for a vector, if any clears the threshold
    async fn find_similar(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Option<RetrievalHit>, DomainError> {
        let hits = self.search(vector, &params.clone().with_limit(1)).await?;
        Ok(hits.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_defaults() {
        let params = SearchParams::new(Mode::Analyze, 0.9);

        assert_eq!(params.mode, Mode::Analyze);
        assert_eq!(params.limit, 1);
        assert!((params.min_similarity - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let params = SearchParams::new(Mode::Rewrite, 0.85);

        assert!(params.accepts(0.85));
        assert!(params.accepts(0.851));
        assert!(!params.accepts(0.849));
    }

    #[test]
    fn test_with_limit() {
        let params = SearchParams::new(Mode::Rewrite, 0.5).with_limit(5);
        assert_eq!(params.limit, 5);
    }
}
