//! Cache gating configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Thresholds and timeouts applied by the message flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Minimum similarity for a cache hit (0.0 to 1.0)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Minimum similarity at store time for a result to count as a duplicate
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f32,

    /// Upper bound on one generation call, in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Upper bound on the embed + search lookup, in seconds
    #[serde(default = "default_cache_timeout_secs")]
    pub cache_timeout_secs: u64,
}

fn default_confidence_threshold() -> f32 {
    0.95
}

fn default_dedup_threshold() -> f32 {
    0.85
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_cache_timeout_secs() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            dedup_threshold: default_dedup_threshold(),
            generation_timeout_secs: default_generation_timeout_secs(),
            cache_timeout_secs: default_cache_timeout_secs(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_secs(self.cache_timeout_secs)
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_dedup_threshold(mut self, threshold: f32) -> Self {
        self.dedup_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Sub-second remainders round up to the next whole second
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout_secs = whole_seconds(timeout);
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout_secs = whole_seconds(timeout);
        self
    }

    /// Reject values that clamping cannot repair.
    ///
    /// A NaN threshold never accepts a hit and a zero timeout fails every call.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("confidence_threshold", self.confidence_threshold),
            ("dedup_threshold", self.dedup_threshold),
        ] {
            if !value.is_finite() {
                return Err(DomainError::configuration(format!(
                    "cache.{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("generation_timeout_secs", self.generation_timeout_secs),
            ("cache_timeout_secs", self.cache_timeout_secs),
        ] {
            if value == 0 {
                return Err(DomainError::configuration(format!(
                    "cache.{} must be at least 1",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Clamp thresholds loaded from external configuration into [0, 1]
    pub fn normalized(self) -> Self {
        let confidence = self.confidence_threshold;
        let dedup = self.dedup_threshold;
        self.with_confidence_threshold(confidence)
            .with_dedup_threshold(dedup)
    }
}

fn whole_seconds(timeout: Duration) -> u64 {
    timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();

        assert!((config.confidence_threshold - 0.95).abs() < 0.001);
        assert!((config.dedup_threshold - 0.85).abs() < 0.001);
        assert_eq!(config.generation_timeout(), Duration::from_secs(60));
        assert_eq!(config.cache_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_thresholds_clamped() {
        let config = CacheConfig::new()
            .with_confidence_threshold(1.5)
            .with_dedup_threshold(-0.2);

        assert!((config.confidence_threshold - 1.0).abs() < 0.001);
        assert!(config.dedup_threshold.abs() < 0.001);
    }

    #[test]
    fn test_normalized_from_raw_values() {
        let config = CacheConfig {
            confidence_threshold: 2.0,
            dedup_threshold: 0.5,
            ..CacheConfig::default()
        }
        .normalized();

        assert!((config.confidence_threshold - 1.0).abs() < 0.001);
        assert!((config.dedup_threshold - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config = CacheConfig::new()
            .with_cache_timeout(Duration::from_millis(500))
            .with_generation_timeout(Duration::from_millis(1500));

        assert_eq!(config.cache_timeout(), Duration::from_secs(1));
        assert_eq!(config.generation_timeout(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CacheConfig {
            cache_timeout_secs: 0,
            ..CacheConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_timeout_secs"));
    }

    #[test]
    fn test_nan_threshold_survives_clamp_but_fails_validation() {
        let config = CacheConfig {
            dedup_threshold: f32::NAN,
            ..CacheConfig::default()
        }
        .normalized();

        assert!(config.dedup_threshold.is_nan());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("dedup_threshold"));
    }
}
