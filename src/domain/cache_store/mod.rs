//! Cache store domain models and traits
//!
//! Entries are partitioned by [`Mode`](crate::domain::Mode) and retrieved by
//! vector similarity against a confidence threshold.

mod config;
mod entry;
mod store;

pub use config::CacheConfig;
pub use entry::{CacheEntry, EntryUpdate, FeedbackState, NewCacheEntry};
pub use store::{CacheStore, RetrievalHit, SearchParams};
