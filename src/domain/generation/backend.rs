//! Generation backend trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::message::GeneratedResponse;
use crate::domain::{DomainError, Mode};

/// Produces a structured response for a message in a given mode.
///
/// Implementations own any retry policy; callers treat an error as final.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync + Debug {
    /// Generate a response for `message` in `mode`
    async fn generate(&self, message: &str, mode: Mode) -> Result<GeneratedResponse, DomainError>;

    /// Get the backend name
    fn backend_name(&self) -> &'static str;
}
