use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Generation failed: {message}")]
    Generation { message: String },

    #[error("Malformed generation: {message}")]
    MalformedGeneration { message: String },

    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn malformed_generation(message: impl Into<String>) -> Self {
        Self::MalformedGeneration {
            message: message.into(),
        }
    }

    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::CacheUnavailable {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the generation step failed for the request.
    /// Malformed output counts as a failed generation.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::Generation { .. } | Self::MalformedGeneration { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Entry 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Entry 'abc' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_malformed_generation_is_generation_failure() {
        let error = DomainError::malformed_generation("missing empathy");
        assert!(error.is_generation_failure());
        assert_eq!(error.to_string(), "Malformed generation: missing empathy");
    }

    #[test]
    fn test_cache_unavailable_is_not_generation_failure() {
        let error = DomainError::cache_unavailable("connection refused");
        assert!(!error.is_generation_failure());
    }
}
