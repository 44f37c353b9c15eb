//! Store wrappers for exercising failure paths of the services

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::domain::{
    CacheEntry, CacheStore, DomainError, EntryUpdate, Mode, NewCacheEntry, RetrievalHit,
    SearchParams,
};
use crate::infrastructure::cache_store::InMemoryCacheStore;

/// In-memory store with switchable failures and call counters
#[derive(Debug, Default)]
pub struct FaultyStore {
    pub inner: InMemoryCacheStore,
    pub fail_search: AtomicBool,
    pub fail_create: AtomicBool,
    pub searches: AtomicUsize,
    pub creates: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_search() -> Arc<Self> {
        let store = Self::default();
        store.fail_search.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn failing_create() -> Arc<Self> {
        let store = Self::default();
        store.fail_create.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for FaultyStore {
    async fn search(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<RetrievalHit>, DomainError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(DomainError::cache_unavailable("search refused"));
        }
        self.inner.search(vector, params).await
    }

    async fn create(&self, entry: NewCacheEntry) -> Result<String, DomainError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DomainError::storage("create refused"));
        }
        self.inner.create(entry).await
    }

    async fn get(&self, id: &str) -> Result<Option<CacheEntry>, DomainError> {
        self.inner.get(id).await
    }

    async fn update(&self, id: &str, update: EntryUpdate) -> Result<(), DomainError> {
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.inner.delete(id).await
    }

    async fn clear(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.inner.clear(mode).await
    }

    async fn count(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.inner.count(mode).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.inner.health_check().await
    }
}

/// Store whose `get` waits until `parties` readers have all read
#[derive(Debug)]
pub struct BarrierStore {
    pub inner: InMemoryCacheStore,
    barrier: Barrier,
}

impl BarrierStore {
    pub fn new(parties: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryCacheStore::new(),
            barrier: Barrier::new(parties),
        })
    }
}

#[async_trait]
impl CacheStore for BarrierStore {
    async fn search(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<RetrievalHit>, DomainError> {
        self.inner.search(vector, params).await
    }

    async fn create(&self, entry: NewCacheEntry) -> Result<String, DomainError> {
        self.inner.create(entry).await
    }

    async fn get(&self, id: &str) -> Result<Option<CacheEntry>, DomainError> {
        let entry = self.inner.get(id).await;
        self.barrier.wait().await;
        entry
    }

    async fn update(&self, id: &str, update: EntryUpdate) -> Result<(), DomainError> {
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.inner.delete(id).await
    }

    async fn clear(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.inner.clear(mode).await
    }

    async fn count(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        self.inner.count(mode).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.inner.health_check().await
    }
}
