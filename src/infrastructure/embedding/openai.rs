//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a provider for the default model
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a provider with a custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            dimensions: known_dimensions(DEFAULT_MODEL).unwrap_or(1536),
        }
    }

    /// Use another model. Unknown models keep the current dimension.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        if let Some(dims) = known_dimensions(&self.model) {
            self.dimensions = dims;
        }
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })?;

        let vector = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::provider("openai", "No embedding in response"))?;

        if vector.len() != self.dimensions {
            return Err(DomainError::provider(
                "openai",
                format!(
                    "Expected {} dimensions from {}, got {}",
                    self.dimensions,
                    self.model,
                    vector.len()
                ),
            ));
        }

        Ok(vector)
    }
}

fn known_dimensions(model: &str) -> Option<usize> {
    EMBEDDING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.embeddings_url();
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn create_mock_response(dimensions: usize) -> serde_json::Value {
        let embedding: Vec<f32> = (0..dimensions).map(|j| j as f32 * 0.001).collect();
        serde_json::json!({
            "model": "text-embedding-ada-002",
            "data": [{"index": 0, "embedding": embedding, "object": "embedding"}],
            "usage": {"prompt_tokens": 3, "total_tokens": 3}
        })
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(1536));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let vector = provider.embed("Hello world").await.unwrap();

        assert_eq!(vector.len(), 1536);
        let (_, body) = &provider.client.sent_bodies()[0];
        assert_eq!(body["input"], "Hello world");
        assert_eq!(body["model"], "text-embedding-ada-002");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(256));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let err = provider.embed("Hello").await.unwrap_err();
        assert!(err.to_string().contains("1536"));
    }

    #[tokio::test]
    async fn test_embed_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded");
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        assert!(provider.embed("Hello").await.is_err());
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let client = MockHttpClient::new().with_response(
            "http://localhost:8080/v1/embeddings",
            create_mock_response(1536),
        );
        let provider =
            OpenAiEmbeddingProvider::with_base_url(client, "test-key", "http://localhost:8080");

        assert!(provider.embed("Test").await.is_ok());
    }

    #[test]
    fn test_provider_info() {
        let provider = OpenAiEmbeddingProvider::new(MockHttpClient::new(), "test-key")
            .with_model("text-embedding-3-large");

        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "text-embedding-3-large");
        assert_eq!(provider.dimensions(), 3072);
    }
}
