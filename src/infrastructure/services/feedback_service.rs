//! Feedback ledger: like/dislike drives an entry's rating and eviction

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{CacheStore, DomainError, EntryUpdate, FeedbackState};
use crate::infrastructure::observability::record_feedback;

/// Result of applying one feedback event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Updated {
        rating: i64,
        feedback_state: FeedbackState,
    },
    Evicted,
}

/// Applies feedback as read-modify-write without compare-and-swap.
///
/// Concurrent events on one entry may lose an update (last write wins).
#[derive(Debug, Clone)]
pub struct FeedbackService {
    store: Arc<dyn CacheStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn apply_feedback(
        &self,
        entry_id: &str,
        liked: bool,
    ) -> Result<FeedbackOutcome, DomainError> {
        let result = self.apply(entry_id, liked).await;

        let label = match &result {
            Ok(FeedbackOutcome::Updated { .. }) => "updated",
            Ok(FeedbackOutcome::Evicted) => "evicted",
            Err(e) if e.is_not_found() => "not_found",
            Err(_) => "error",
        };
        record_feedback(liked, label);

        result
    }

    async fn apply(&self, entry_id: &str, liked: bool) -> Result<FeedbackOutcome, DomainError> {
        let entry = self
            .store
            .get(entry_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Cache entry '{}' not found", entry_id)))?;

        let rating = entry.rating() + if liked { 1 } else { -1 };

        if !liked && rating <= 0 {
            if !self.store.delete(entry_id).await? {
                warn!(entry_id = %entry_id, "Entry vanished before eviction");
            }
            info!(entry_id = %entry_id, "Evicted cache entry after negative feedback");
            return Ok(FeedbackOutcome::Evicted);
        }

        let feedback_state = FeedbackState::from_liked(liked);
        self.store
            .update(
                entry_id,
                EntryUpdate::new()
                    .with_rating(rating)
                    .with_feedback_state(feedback_state),
            )
            .await?;

        info!(entry_id = %entry_id, rating, feedback = feedback_state.as_str(), "Applied feedback");

        Ok(FeedbackOutcome::Updated {
            rating,
            feedback_state,
        })
    }
}
