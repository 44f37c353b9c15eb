//! Cache entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::message::GeneratedResponse;
use crate::domain::Mode;

/// Direction of the most recent feedback event on an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackState {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl FeedbackState {
    /// State produced by a like (`true`) or dislike (`false`)
    pub fn from_liked(liked: bool) -> Self {
        if liked {
            FeedbackState::Positive
        } else {
            FeedbackState::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackState::Neutral => "neutral",
            FeedbackState::Positive => "positive",
            FeedbackState::Negative => "negative",
        }
    }

    /// Parse a stored feedback tag, unknown tags read as neutral
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "positive" => FeedbackState::Positive,
            "negative" => FeedbackState::Negative,
            _ => FeedbackState::Neutral,
        }
    }
}

/// A stored, retrievable message/response pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    id: String,
    message: String,
    mode: Mode,
    response: GeneratedResponse,
    vector: Vec<f32>,
    rating: i64,
    feedback_state: FeedbackState,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Materialise a new entry with a fresh rating
    pub fn new(id: impl Into<String>, new_entry: NewCacheEntry) -> Self {
        Self {
            id: id.into(),
            message: new_entry.message,
            mode: new_entry.mode,
            response: new_entry.response,
            vector: new_entry.vector,
            rating: 0,
            feedback_state: FeedbackState::Neutral,
            created_at: Utc::now(),
        }
    }

    /// Rebuild an entry read back from a backend
    pub fn restore(
        id: impl Into<String>,
        message: impl Into<String>,
        mode: Mode,
        response: GeneratedResponse,
        vector: Vec<f32>,
        rating: i64,
        feedback_state: FeedbackState,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            mode,
            response,
            vector,
            rating,
            feedback_state,
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn response(&self) -> &GeneratedResponse {
        &self.response
    }

    pub fn into_response(self) -> GeneratedResponse {
        self.response
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn feedback_state(&self) -> FeedbackState {
        self.feedback_state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &EntryUpdate) {
        if let Some(rating) = update.rating {
            self.rating = rating;
        }

        if let Some(state) = update.feedback_state {
            self.feedback_state = state;
        }
    }
}

/// Fields supplied when creating an entry; id and rating are assigned by the store
#[derive(Debug, Clone)]
pub struct NewCacheEntry {
    pub message: String,
    pub mode: Mode,
    pub response: GeneratedResponse,
    pub vector: Vec<f32>,
}

impl NewCacheEntry {
    pub fn new(
        message: impl Into<String>,
        mode: Mode,
        response: GeneratedResponse,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            message: message.into(),
            mode,
            response,
            vector,
        }
    }
}

/// Partial update of an entry's mutable fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub rating: Option<i64>,
    pub feedback_state: Option<FeedbackState>,
}

impl EntryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_feedback_state(mut self, state: FeedbackState) -> Self {
        self.feedback_state = Some(state);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.feedback_state.is_none()
    }
}
