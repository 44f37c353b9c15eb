use serde::Deserialize;

use crate::domain::{ABTestConfig, CacheConfig};

const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ab_test: ABTestConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Empty falls back to the `OPENAI_API_KEY` environment variable
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_openai_timeout_secs() -> u64 {
    60
}

impl OpenAiConfig {
    /// Configured key, or the standard environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.clone());
        }

        std::env::var(OPENAI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreBackend {
    #[default]
    InMemory,
    Weaviate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub backend: VectorStoreBackend,
    #[serde(default = "default_vector_store_url")]
    pub url: String,
    #[serde(default = "default_class_name")]
    pub class_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_vector_store_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_vector_store_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_class_name() -> String {
    "ChatMessage".to_string()
}

fn default_vector_store_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            url: default_vector_store_url(),
            class_name: default_class_name(),
            api_key: None,
            timeout_secs: default_vector_store_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>().map(Self::normalized)
    }

    /// Clamp thresholds and reject invalid A/B weights
    pub fn normalized(mut self) -> Self {
        self.cache = self.cache.normalized();
        self
    }

    /// Validate sections that cannot be repaired by clamping
    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        self.ab_test.clone().validated()?;
        self.cache.validate()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.cache.confidence_threshold, 0.95);
        assert_eq!(config.ab_test.cache_weight, 0.0);
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.openai.temperature, 0.7);
        assert_eq!(config.openai.max_tokens, 2000);
        assert_eq!(config.vector_store.backend, VectorStoreBackend::InMemory);
        assert_eq!(config.vector_store.class_name, "ChatMessage");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "ab_test": { "cache_weight": 100.0, "generation_weight": 0.0 },
            "vector_store": { "backend": "weaviate" },
            "cache": { "confidence_threshold": 1.7 }
        }))
        .unwrap();
        let config = config.normalized();

        assert_eq!(config.ab_test.cache_probability(), 1.0);
        assert_eq!(config.vector_store.backend, VectorStoreBackend::Weaviate);
        assert_eq!(config.vector_store.url, "http://localhost:8080");
        assert_eq!(config.cache.confidence_threshold, 1.0);
        assert_eq!(config.cache.dedup_threshold, 0.85);
    }

    #[test]
    fn test_negative_weight_fails_validation() {
        let mut config = AppConfig::default();
        config.ab_test.cache_weight = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_generation_timeout_fails_validation() {
        let mut config = AppConfig::default();
        config.cache.generation_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_fails_validation() {
        let mut config = AppConfig::default();
        config.cache.confidence_threshold = f32::NAN;
        let config = config.normalized();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configured_api_key_wins() {
        let config = OpenAiConfig {
            api_key: "sk-configured".to_string(),
            ..OpenAiConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("sk-configured"));
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(AppConfig::default().socket_addr(), "0.0.0.0:4000");
    }
}
