//! In-memory cache store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::embedding::similarity_score;
use crate::domain::{
    CacheEntry, CacheStore, DomainError, EntryUpdate, Mode, NewCacheEntry, RetrievalHit,
    SearchParams,
};

/// In-memory cache store using linear search.
///
/// Suitable for development and tests. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    available: AtomicBool,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every operation fails with `CacheUnavailable`
    #[cfg(test)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::cache_unavailable("in-memory store is offline"))
        }
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> DomainError {
        DomainError::internal(format!("Failed to acquire lock: {}", e))
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn search(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<RetrievalHit>, DomainError> {
        self.ensure_available()?;

        let entries = self.entries.read().map_err(Self::lock_error)?;

        let mut results: Vec<RetrievalHit> = entries
            .values()
            .filter(|entry| entry.mode() == params.mode)
            .map(|entry| RetrievalHit::new(entry.clone(), similarity_score(vector, entry.vector())))
            .filter(|hit| params.accepts(hit.similarity))
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(params.limit);

        Ok(results)
    }

    async fn create(&self, entry: NewCacheEntry) -> Result<String, DomainError> {
        self.ensure_available()?;

        let id = Uuid::new_v4().to_string();
        let entry = CacheEntry::new(id.clone(), entry);

        let mut entries = self.entries.write().map_err(Self::lock_error)?;
        entries.insert(id.clone(), entry);

        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<CacheEntry>, DomainError> {
        self.ensure_available()?;

        let entries = self.entries.read().map_err(Self::lock_error)?;
        Ok(entries.get(id).cloned())
    }

    async fn update(&self, id: &str, update: EntryUpdate) -> Result<(), DomainError> {
        self.ensure_available()?;

        let mut entries = self.entries.write().map_err(Self::lock_error)?;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Cache entry '{}' not found", id)))?;

        entry.apply(&update);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.ensure_available()?;

        let mut entries = self.entries.write().map_err(Self::lock_error)?;
        Ok(entries.remove(id).is_some())
    }

    async fn clear(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.ensure_available()?;

        let mut entries = self.entries.write().map_err(Self::lock_error)?;
        let before = entries.len();

        match mode {
            Some(mode) => entries.retain(|_, entry| entry.mode() != mode),
            None => entries.clear(),
        }

        Ok(before - entries.len())
    }

    async fn count(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.ensure_available()?;

        let entries = self.entries.read().map_err(Self::lock_error)?;
        Ok(match mode {
            Some(mode) => entries.values().filter(|e| e.mode() == mode).count(),
            None => entries.len(),
        })
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.ensure_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedbackState, GeneratedResponse};

    fn new_entry(message: &str, mode: Mode, vector: Vec<f32>) -> NewCacheEntry {
        NewCacheEntry::new(
            message,
            mode,
            GeneratedResponse::rewrite(format!("Long {}", message), "Short"),
            vector,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryCacheStore::new();
        let id = store
            .create(new_entry("hello", Mode::Rewrite, vec![1.0, 0.0]))
            .await
            .unwrap();

        let entry = store.get(&id).await.unwrap().unwrap();
        assert_eq!(entry.id(), id);
        assert_eq!(entry.message(), "hello");
        assert_eq!(entry.rating(), 0);
        assert_eq!(entry.feedback_state(), FeedbackState::Neutral);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryCacheStore::new();
        let a = store.create(new_entry("a", Mode::Rewrite, vec![1.0])).await.unwrap();
        let b = store.create(new_entry("a", Mode::Rewrite, vec![1.0])).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_search_is_mode_scoped() {
        let store = InMemoryCacheStore::new();
        store
            .create(new_entry("hello", Mode::Analyze, vec![1.0, 0.0]))
            .await
            .unwrap();

        let params = SearchParams::new(Mode::Rewrite, 0.0).with_limit(10);
        assert!(store.search(&[1.0, 0.0], &params).await.unwrap().is_empty());

        let params = SearchParams::new(Mode::Analyze, 0.0).with_limit(10);
        assert_eq!(store.search(&[1.0, 0.0], &params).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity_and_limits() {
        let store = InMemoryCacheStore::new();
        store.create(new_entry("far", Mode::Rewrite, vec![0.6, 0.8])).await.unwrap();
        store.create(new_entry("exact", Mode::Rewrite, vec![1.0, 0.0])).await.unwrap();
        store.create(new_entry("near", Mode::Rewrite, vec![0.9, 0.1])).await.unwrap();

        let params = SearchParams::new(Mode::Rewrite, 0.0).with_limit(2);
        let hits = store.search(&[1.0, 0.0], &params).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.message(), "exact");
        assert_eq!(hits[1].entry.message(), "near");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let store = InMemoryCacheStore::new();
        store.create(new_entry("same", Mode::Rewrite, vec![1.0, 0.0])).await.unwrap();

        let params = SearchParams::new(Mode::Rewrite, 1.0);
        assert_eq!(store.search(&[2.0, 0.0], &params).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_below_threshold_is_filtered() {
        let store = InMemoryCacheStore::new();
        store.create(new_entry("other", Mode::Rewrite, vec![0.0, 1.0])).await.unwrap();

        let hit = store
            .find_similar(&[1.0, 0.0], &SearchParams::new(Mode::Rewrite, 0.5))
            .await
            .unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_update_rating_and_state() {
        let store = InMemoryCacheStore::new();
        let id = store.create(new_entry("x", Mode::Rewrite, vec![1.0])).await.unwrap();

        store
            .update(
                &id,
                EntryUpdate::new()
                    .with_rating(1)
                    .with_feedback_state(FeedbackState::Positive),
            )
            .await
            .unwrap();

        let entry = store.get(&id).await.unwrap().unwrap();
        assert_eq!(entry.rating(), 1);
        assert_eq!(entry.feedback_state(), FeedbackState::Positive);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryCacheStore::new();
        let err = store.update("missing", EntryUpdate::new().with_rating(1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryCacheStore::new();
        let id = store.create(new_entry("x", Mode::Rewrite, vec![1.0])).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_and_count_by_mode() {
        let store = InMemoryCacheStore::new();
        store.create(new_entry("a", Mode::Rewrite, vec![1.0])).await.unwrap();
        store.create(new_entry("b", Mode::Rewrite, vec![1.0])).await.unwrap();
        store.create(new_entry("c", Mode::Analyze, vec![1.0])).await.unwrap();

        assert_eq!(store.count(None).await.unwrap(), 3);
        assert_eq!(store.clear(Some(Mode::Rewrite)).await.unwrap(), 2);
        assert_eq!(store.count(Some(Mode::Rewrite)).await.unwrap(), 0);
        assert_eq!(store.count(Some(Mode::Analyze)).await.unwrap(), 1);
        assert_eq!(store.clear(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = InMemoryCacheStore::new();
        store.set_available(false);

        let err = store
            .search(&[1.0], &SearchParams::new(Mode::Rewrite, 0.9))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CacheUnavailable { .. }));
        assert!(store.health_check().await.is_err());
    }
}
