//! Infrastructure services

mod feedback_service;
mod message_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use feedback_service::{FeedbackOutcome, FeedbackService};
pub use message_service::MessageService;
