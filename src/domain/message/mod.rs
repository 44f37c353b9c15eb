//! Message payloads and processing outcomes

mod outcome;
mod response;

pub use outcome::{ProcessedMessage, ResponseOrigin, StoreStatus};
pub use response::{
    EmpathyAnalysis, FullAnalysis, GeneratedResponse, SelfAwarenessAnalysis,
    SelfRegulationAnalysis, SocialSkillsAnalysis,
};

#[cfg(test)]
pub(crate) use response::fixtures;
