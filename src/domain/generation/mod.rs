//! Generation backend domain trait

mod backend;

pub use backend::GenerationBackend;

#[cfg(test)]
pub use backend::MockGenerationBackend;
