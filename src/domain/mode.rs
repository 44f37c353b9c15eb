//! Request mode, the partition key of the cache

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Partition of the request space. Cached entries never match across modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Structured emotional-intelligence analysis plus rewritten text
    Analyze,
    /// Rewritten text only
    Rewrite,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Analyze, Mode::Rewrite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Analyze => "analyze",
            Mode::Rewrite => "rewrite",
        }
    }

    /// Whether responses in this mode must carry a structured analysis
    pub fn requires_analysis(&self) -> bool {
        matches!(self, Mode::Analyze)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analyze" => Ok(Mode::Analyze),
            "rewrite" => Ok(Mode::Rewrite),
            other => Err(DomainError::validation(format!(
                "Unknown mode '{}', expected 'analyze' or 'rewrite'",
                other
            ))),
        }
    }
}
