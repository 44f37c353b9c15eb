//! A/B routing weights

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Process-wide path weights. They need not sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ABTestConfig {
    /// Weight of the generation path
    #[serde(default = "default_generation_weight")]
    pub generation_weight: f64,

    /// Weight of the cache path
    #[serde(default)]
    pub cache_weight: f64,

    /// Weight of the local model path, served by generation
    #[serde(default)]
    pub local_llm_weight: f64,
}

fn default_generation_weight() -> f64 {
    100.0
}

impl Default for ABTestConfig {
    fn default() -> Self {
        Self {
            generation_weight: default_generation_weight(),
            cache_weight: 0.0,
            local_llm_weight: 0.0,
        }
    }
}

impl ABTestConfig {
    /// Create a validated config
    pub fn new(generation_weight: f64, cache_weight: f64) -> Result<Self, DomainError> {
        Self {
            generation_weight,
            cache_weight,
            local_llm_weight: 0.0,
        }
        .validated()
    }

    /// Set the local model weight
    pub fn with_local_llm_weight(mut self, weight: f64) -> Result<Self, DomainError> {
        self.local_llm_weight = weight;
        self.validated()
    }

    /// Reject negative or non-finite weights
    pub fn validated(self) -> Result<Self, DomainError> {
        for (name, weight) in self.named_weights() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DomainError::configuration(format!(
                    "A/B weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        Ok(self)
    }

    fn named_weights(&self) -> [(&'static str, f64); 3] {
        [
            ("cache", self.cache_weight),
            ("generation", self.generation_weight),
            ("local_llm", self.local_llm_weight),
        ]
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.cache_weight + self.generation_weight + self.local_llm_weight
    }

    /// Probability of attempting the cache path, 0 when all weights are 0
    pub fn cache_probability(&self) -> f64 {
        let total = self.total_weight();

        if total <= 0.0 {
            return 0.0;
        }

        self.cache_weight / total
    }
}
