//! Infrastructure layer - External service implementations

pub mod cache_store;
pub mod embedding;
pub mod generation;
pub mod http;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod services;
