//! Application state for shared services

use std::sync::Arc;

use crate::domain::CacheStore;
use crate::infrastructure::services::{FeedbackService, MessageService};

/// Shared services handed to every handler. Constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub message_service: Arc<MessageService>,
    pub feedback_service: Arc<FeedbackService>,
    pub cache_store: Arc<dyn CacheStore>,
}

impl AppState {
    pub fn new(
        message_service: MessageService,
        feedback_service: FeedbackService,
        cache_store: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            message_service: Arc::new(message_service),
            feedback_service: Arc::new(feedback_service),
            cache_store,
        }
    }
}
