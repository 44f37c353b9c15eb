//! Domain layer - Core business logic and entities

pub mod cache_store;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod llm;
pub mod message;
pub mod mode;
pub mod routing;

pub use cache_store::{
    CacheConfig, CacheEntry, CacheStore, EntryUpdate, FeedbackState, NewCacheEntry,
    RetrievalHit, SearchParams,
};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use generation::GenerationBackend;
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use message::{
    FullAnalysis, GeneratedResponse, ProcessedMessage, ResponseOrigin, StoreStatus,
};
pub use mode::Mode;
pub use routing::{ABTestConfig, AbRouter, RandomSource, Route, SeededRandom, ThreadRandom};
