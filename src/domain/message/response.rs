//! Generated response payloads and their schema validation

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Mode};

/// Self-awareness category of the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfAwarenessAnalysis {
    pub emotional_background: String,
    pub present_elements: String,
    pub missing_elements: String,
    pub step_back_analysis: String,
}

/// Self-regulation category of the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfRegulationAnalysis {
    pub current_phrasing: String,
    pub improvement_examples: String,
    pub alternative_phrases: String,
}

/// Empathy category of the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpathyAnalysis {
    pub missing_elements: String,
    pub potential_additions: String,
    pub understanding_examples: String,
}

/// Social skills category of the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSkillsAnalysis {
    pub current_impact: String,
    pub improvements: String,
    pub examples: String,
}

/// Four-category emotional intelligence analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub self_awareness: SelfAwarenessAnalysis,
    pub self_regulation: SelfRegulationAnalysis,
    pub empathy: EmpathyAnalysis,
    pub social_skills: SocialSkillsAnalysis,
}

impl FullAnalysis {
    /// Every `(category.field, value)` pair, in a stable order
    fn fields(&self) -> [(&'static str, &str); 13] {
        [
            ("self_awareness.emotional_background", self.self_awareness.emotional_background.as_str()),
            ("self_awareness.present_elements", self.self_awareness.present_elements.as_str()),
            ("self_awareness.missing_elements", self.self_awareness.missing_elements.as_str()),
            ("self_awareness.step_back_analysis", self.self_awareness.step_back_analysis.as_str()),
            ("self_regulation.current_phrasing", self.self_regulation.current_phrasing.as_str()),
            ("self_regulation.improvement_examples", self.self_regulation.improvement_examples.as_str()),
            ("self_regulation.alternative_phrases", self.self_regulation.alternative_phrases.as_str()),
            ("empathy.missing_elements", self.empathy.missing_elements.as_str()),
            ("empathy.potential_additions", self.empathy.potential_additions.as_str()),
            ("empathy.understanding_examples", self.empathy.understanding_examples.as_str()),
            ("social_skills.current_impact", self.social_skills.current_impact.as_str()),
            ("social_skills.improvements", self.social_skills.improvements.as_str()),
            ("social_skills.examples", self.social_skills.examples.as_str()),
        ]
    }

    /// Reject analyses with blank fields
    pub fn validate(&self) -> Result<(), DomainError> {
        let blank: Vec<&str> = self
            .fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(DomainError::malformed_generation(format!(
                "Analysis has empty fields: {}",
                blank.join(", ")
            )))
        }
    }
}

/// Structured result of a generation, also the payload stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FullAnalysis>,
    pub long_version: String,
    pub short_version: String,
}

impl GeneratedResponse {
    /// Create a rewrite-only response
    pub fn rewrite(long_version: impl Into<String>, short_version: impl Into<String>) -> Self {
        Self {
            analysis: None,
            long_version: long_version.into(),
            short_version: short_version.into(),
        }
    }

    /// Create a response carrying a structured analysis
    pub fn analyzed(
        analysis: FullAnalysis,
        long_version: impl Into<String>,
        short_version: impl Into<String>,
    ) -> Self {
        Self {
            analysis: Some(analysis),
            long_version: long_version.into(),
            short_version: short_version.into(),
        }
    }

    /// Validate the payload against the shape required by `mode`.
    ///
    /// A `rewrite` payload that carries an analysis has it dropped; an
    /// `analyze` payload without a complete analysis is malformed.
    pub fn validate_for(mut self, mode: Mode) -> Result<Self, DomainError> {
        if self.long_version.trim().is_empty() {
            return Err(DomainError::malformed_generation("long_version is empty"));
        }

        if self.short_version.trim().is_empty() {
            return Err(DomainError::malformed_generation("short_version is empty"));
        }

        if mode.requires_analysis() {
            match &self.analysis {
                Some(analysis) => analysis.validate()?,
                None => {
                    return Err(DomainError::malformed_generation(
                        "analyze response is missing the analysis",
                    ));
                }
            }
        } else {
            self.analysis = None;
        }

        Ok(self)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_analysis() -> FullAnalysis {
        FullAnalysis {
            self_awareness: SelfAwarenessAnalysis {
                emotional_background: "Frustration with the code quality".into(),
                present_elements: "Direct statement of opinion".into(),
                missing_elements: "Reflection on the trigger".into(),
                step_back_analysis: "Reactive, no pause before writing".into(),
            },
            self_regulation: SelfRegulationAnalysis {
                current_phrasing: "Blunt and absolute".into(),
                improvement_examples: "Describe specific issues".into(),
                alternative_phrases: "I think this part could be clearer".into(),
            },
            empathy: EmpathyAnalysis {
                missing_elements: "Acknowledgement of the author's effort".into(),
                potential_additions: "Recognise constraints they had".into(),
                understanding_examples: "I know this was written under pressure".into(),
            },
            social_skills: SocialSkillsAnalysis {
                current_impact: "Likely to make the author defensive".into(),
                improvements: "Invite collaboration".into(),
                examples: "Could we pair on a refactor?".into(),
            },
        }
    }
}
