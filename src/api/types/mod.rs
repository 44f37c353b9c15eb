//! Request and response types of the HTTP API

pub mod error;
pub mod json;
pub mod messages;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use messages::{
    CacheStatsResponse, ClearCacheQuery, ClearCacheResponse, FeedbackRequest, FeedbackResponse,
    MessageRequest, MessageResponse,
};
