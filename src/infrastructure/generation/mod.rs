//! Generation backend implementations

mod language;
mod llm_backend;
mod prompts;

pub use language::Language;
pub use llm_backend::LlmGenerationBackend;
pub use prompts::{system_prompt, PromptKind, ANALYZE_PROMPT, REWRITE_PROMPT};
