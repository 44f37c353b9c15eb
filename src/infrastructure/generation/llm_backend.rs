//! Generation backend over a chat completion provider

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::language::Language;
use super::prompts::{system_prompt, PromptKind};
use crate::domain::llm::FinishReason;
use crate::domain::{
    DomainError, FullAnalysis, GeneratedResponse, GenerationBackend, LlmProvider, LlmRequest, Mode,
};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Deserialize)]
struct RewritePayload {
    long_version: String,
    short_version: String,
}

/// Issues one JSON-mode chat call per prompt the mode needs
#[derive(Debug, Clone)]
pub struct LlmGenerationBackend {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmGenerationBackend {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        kind: PromptKind,
        language: Language,
        message: &str,
    ) -> Result<Value, DomainError> {
        let request = LlmRequest::builder()
            .system(system_prompt(kind, language))
            .user(message)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .json_object()
            .build();

        let response = self
            .provider
            .chat(&self.model, request)
            .await
            .map_err(|e| DomainError::generation(e.to_string()))?;

        if let Some(usage) = &response.usage {
            debug!(
                kind = ?kind,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion finished"
            );
        }

        // A reply cut at max_tokens is almost always truncated JSON
        if response.finish_reason == Some(FinishReason::Length) {
            warn!(kind = ?kind, max_tokens = self.max_tokens, "Reply hit the token limit");
        }

        serde_json::from_str(response.content()).map_err(|e| {
            DomainError::generation(format!("{:?} reply is not valid JSON: {}", kind, e))
        })
    }

    async fn rewrite(&self, language: Language, message: &str) -> Result<RewritePayload, DomainError> {
        let json = self.complete(PromptKind::Rewrite, language, message).await?;
        decode(json, "rewrite")
    }

    async fn analyze(&self, language: Language, message: &str) -> Result<FullAnalysis, DomainError> {
        let mut json = self.complete(PromptKind::Analysis, language, message).await?;

        // Some replies wrap the categories in an "analysis" object
        if let Some(inner) = json.get_mut("analysis").map(Value::take) {
            json = inner;
        }

        decode(json, "analysis")
    }
}

fn decode<T: DeserializeOwned>(json: Value, what: &str) -> Result<T, DomainError> {
    serde_json::from_value(json)
        .map_err(|e| DomainError::malformed_generation(format!("Invalid {} reply: {}", what, e)))
}

#[async_trait]
impl GenerationBackend for LlmGenerationBackend {
    async fn generate(&self, message: &str, mode: Mode) -> Result<GeneratedResponse, DomainError> {
        let language = Language::detect(message);
        debug!(mode = %mode, language = language.code(), model = %self.model, "Generating response");

        let response = match mode {
            Mode::Analyze => {
                let analysis = self.analyze(language, message).await?;
                let rewrite = self.rewrite(language, message).await?;
                GeneratedResponse::analyzed(analysis, rewrite.long_version, rewrite.short_version)
            }
            Mode::Rewrite => {
                let rewrite = self.rewrite(language, message).await?;
                GeneratedResponse::rewrite(rewrite.long_version, rewrite.short_version)
            }
        };

        response.validate_for(mode)
    }

    fn backend_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponseFormat, MockLlmProvider};
    use crate::domain::message::fixtures::sample_analysis;

    const REWRITE_REPLY: &str = r#"{"long_version": "I've noticed some areas we could improve.", "short_version": "Let's improve it."}"#;

    fn backend(provider: MockLlmProvider) -> (LlmGenerationBackend, Arc<MockLlmProvider>) {
        let provider = Arc::new(provider);
        (LlmGenerationBackend::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_rewrite_issues_one_call() {
        let (backend, provider) = backend(MockLlmProvider::new().with_reply(REWRITE_REPLY));

        let response = backend.generate("This code is terrible!", Mode::Rewrite).await.unwrap();

        assert_eq!(response.short_version, "Let's improve it.");
        assert!(response.analysis.is_none());

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].response_format, Some(LlmResponseFormat::JsonObject));
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].max_tokens, Some(2000));
        assert_eq!(requests[0].last_user_content(), Some("This code is terrible!"));
    }

    #[tokio::test]
    async fn test_sampling_settings_reach_every_call() {
        let analysis = serde_json::to_string(&sample_analysis()).unwrap();
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_reply(analysis)
                .with_reply(REWRITE_REPLY),
        );
        let backend = LlmGenerationBackend::new(provider.clone())
            .with_model("gpt-4o-mini")
            .with_temperature(0.2)
            .with_max_tokens(512);

        backend.generate("This code is terrible!", Mode::Analyze).await.unwrap();

        assert_eq!(backend.model(), "gpt-4o-mini");
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.temperature, Some(0.2));
            assert_eq!(request.max_tokens, Some(512));
        }
    }

    #[tokio::test]
    async fn test_analyze_combines_both_calls() {
        let analysis = serde_json::to_string(&sample_analysis()).unwrap();
        let (backend, provider) = backend(
            MockLlmProvider::new()
                .with_reply(analysis)
                .with_reply(REWRITE_REPLY),
        );

        let response = backend.generate("This code is terrible!", Mode::Analyze).await.unwrap();

        assert_eq!(response.analysis, Some(sample_analysis()));
        assert_eq!(response.long_version, "I've noticed some areas we could improve.");
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_wrapped_analysis_is_accepted() {
        let wrapped = serde_json::json!({ "analysis": sample_analysis() }).to_string();
        let (backend, _) = backend(
            MockLlmProvider::new()
                .with_reply(wrapped)
                .with_reply(REWRITE_REPLY),
        );

        assert!(backend.generate("Hi", Mode::Analyze).await.is_ok());
    }

    #[tokio::test]
    async fn test_string_valued_category_is_malformed() {
        let reply = r#"{"self_awareness": "x", "self_regulation": "x", "empathy": "x", "social_skills": "x"}"#;
        let (backend, _) = backend(MockLlmProvider::new().with_reply(reply));

        let err = backend.generate("Hi", Mode::Analyze).await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedGeneration { .. }));
    }

    #[tokio::test]
    async fn test_missing_short_version_is_malformed() {
        let (backend, _) =
            backend(MockLlmProvider::new().with_reply(r#"{"long_version": "only long"}"#));

        let err = backend.generate("Hi", Mode::Rewrite).await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedGeneration { .. }));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_generation_error() {
        let (backend, _) = backend(MockLlmProvider::new().with_reply("Sure! Here you go"));

        let err = backend.generate("Hi", Mode::Rewrite).await.unwrap_err();
        assert!(matches!(err, DomainError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_provider_error_is_generation_error() {
        let (backend, _) = backend(MockLlmProvider::new().with_error("rate limited"));

        let err = backend.generate("Hi", Mode::Rewrite).await.unwrap_err();
        assert!(matches!(err, DomainError::Generation { .. }));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_russian_message_gets_language_instruction() {
        let (backend, provider) = backend(MockLlmProvider::new().with_reply(REWRITE_REPLY));

        backend.generate("Этот код ужасен!", Mode::Rewrite).await.unwrap();

        let system = &provider.requests()[0].messages[0].content;
        assert!(system.contains("Respond in Russian"));
    }

    #[tokio::test]
    async fn test_custom_model_is_used() {
        let (backend, _) = backend(MockLlmProvider::new().with_reply(REWRITE_REPLY));
        let backend = backend.with_model("gpt-4o-mini");

        assert_eq!(backend.model(), "gpt-4o-mini");
        assert!(backend.generate("Hi", Mode::Rewrite).await.is_ok());
    }
}
