//! Message, feedback and cache administration payloads

use serde::{Deserialize, Serialize};

use crate::domain::{FeedbackState, FullAnalysis, Mode, ProcessedMessage, StoreStatus};
use crate::infrastructure::services::FeedbackOutcome;

/// Body of `/api/rewriteMessage` and `/api/analyzeMessage`
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Where a response came from, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatusLabel {
    Stored,
    SimilarExists,
    Failed,
}

impl From<&StoreStatus> for StoreStatusLabel {
    fn from(status: &StoreStatus) -> Self {
        match status {
            StoreStatus::Stored { .. } => Self::Stored,
            StoreStatus::SimilarExists { .. } => Self::SimilarExists,
            StoreStatus::Failed => Self::Failed,
        }
    }
}

/// Rewritten message, plus the analysis in analyze mode.
///
/// `id` is the cache entry that feedback should target. It is absent when
/// the store step failed.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FullAnalysis>,
    pub long_version: String,
    pub short_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    pub source: ResponseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_status: Option<StoreStatusLabel>,
}

impl From<ProcessedMessage> for MessageResponse {
    fn from(processed: ProcessedMessage) -> Self {
        let id = processed.entry_id().map(str::to_string);
        let similarity = processed.similarity();
        let store_status = processed.store_status().map(StoreStatusLabel::from);
        let source = if processed.is_cache_hit() {
            ResponseSource::Cache
        } else {
            ResponseSource::Generation
        };

        let response = processed.response;
        Self {
            analysis: response.analysis,
            long_version: response.long_version,
            short_version: response.short_version,
            id,
            similarity,
            source,
            store_status,
        }
    }
}

/// Body of `/api/feedback`
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub message_id: String,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: FeedbackOutcome,
}

impl From<FeedbackOutcome> for FeedbackResponse {
    fn from(outcome: FeedbackOutcome) -> Self {
        Self {
            status: "ok",
            outcome,
        }
    }
}

impl FeedbackResponse {
    pub fn rating(&self) -> Option<i64> {
        match &self.outcome {
            FeedbackOutcome::Updated { rating, .. } => Some(*rating),
            FeedbackOutcome::Evicted => None,
        }
    }

    pub fn feedback_state(&self) -> Option<FeedbackState> {
        match &self.outcome {
            FeedbackOutcome::Updated { feedback_state, .. } => Some(*feedback_state),
            FeedbackOutcome::Evicted => None,
        }
    }
}

/// Entry counts of the cache store
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub total: usize,
    pub analyze: usize,
    pub rewrite: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearCacheQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

impl ClearCacheQuery {
    pub fn mode(&self) -> Result<Option<Mode>, crate::domain::DomainError> {
        self.mode.as_deref().map(str::parse).transpose()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedResponse;

    #[test]
    fn test_cache_hit_response() {
        let processed = ProcessedMessage::from_cache(
            GeneratedResponse::rewrite("Long", "Short"),
            "entry-1",
            0.97,
        );

        let json = serde_json::to_value(MessageResponse::from(processed)).unwrap();

        assert_eq!(json["source"], "cache");
        assert_eq!(json["id"], "entry-1");
        assert!(json.get("store_status").is_none());
        assert!(json.get("analysis").is_none());
    }

    #[test]
    fn test_failed_store_has_no_id() {
        let processed = ProcessedMessage::generated(
            GeneratedResponse::rewrite("Long", "Short"),
            StoreStatus::Failed,
        );

        let json = serde_json::to_value(MessageResponse::from(processed)).unwrap();

        assert_eq!(json["source"], "generation");
        assert_eq!(json["store_status"], "failed");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_similar_exists_points_at_existing_entry() {
        let processed = ProcessedMessage::generated(
            GeneratedResponse::rewrite("Long", "Short"),
            StoreStatus::SimilarExists {
                entry_id: "existing".into(),
                similarity: 0.9,
            },
        );

        let response = MessageResponse::from(processed);

        assert_eq!(response.id.as_deref(), Some("existing"));
        assert_eq!(response.store_status, Some(StoreStatusLabel::SimilarExists));
    }

    #[test]
    fn test_feedback_response_wire_format() {
        let response = FeedbackResponse::from(FeedbackOutcome::Updated {
            rating: 1,
            feedback_state: FeedbackState::Positive,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["outcome"], "updated");
        assert_eq!(json["rating"], 1);
        assert_eq!(response.rating(), Some(1));

        let evicted = serde_json::to_value(FeedbackResponse::from(FeedbackOutcome::Evicted)).unwrap();
        assert_eq!(evicted["outcome"], "evicted");
        assert!(evicted.get("rating").is_none());
    }

    #[test]
    fn test_clear_query_mode() {
        let query = ClearCacheQuery {
            mode: Some("rewrite".into()),
        };
        assert_eq!(query.mode().unwrap(), Some(Mode::Rewrite));
        assert_eq!(ClearCacheQuery::default().mode().unwrap(), None);
        assert!(ClearCacheQuery { mode: Some("edit".into()) }.mode().is_err());
    }
}
