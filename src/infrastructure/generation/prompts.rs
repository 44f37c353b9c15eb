//! System prompts for the generation calls

use super::language::Language;
use crate::domain::Mode;

pub const REWRITE_PROMPT: &str = r#"You are a helpful assistant that rewrites messages to be more empathetic.

Your task is simple - rewrite the message in two versions:
1. long_version: A polite and empathetic version that keeps all the points
2. short_version: A shorter version that keeps the main message

Return ONLY the rewritten messages in this JSON format:
{
    "long_version": string,  // The rewritten message
    "short_version": string  // Shorter version
}

Example:
Input: "This code is terrible!"
Output: {
    "long_version": "I've been reviewing the code and noticed some areas that could be improved. Would you be open to discussing potential refactoring approaches?",
    "short_version": "Let's discuss how we can improve the code."
}"#;

pub const ANALYZE_PROMPT: &str = r#"You are an emotional intelligence expert. Analyze this message focusing on emotional awareness and regulation. Pay special attention to whether the person took a "step back" before responding.

The "step back" is a crucial moment of reflection where one asks themselves:
- What am I feeling right now?
- Why am I feeling this way?
- What triggered these emotions?
- What is my goal in this communication?
- Are my current emotions helping or hindering this goal?
- What would be a more constructive way to express my thoughts?

Provide detailed feedback in the following JSON structure:
{
    "self_awareness": {
        "emotional_background": string,  // Identify the emotional undertones and their potential impact
        "present_elements": string,      // What elements of self-awareness are present?
        "missing_elements": string,      // What's missing, especially regarding the "step back" moment?
        "step_back_analysis": string     // Analysis of whether and how effectively the person stepped back before responding
    },
    "self_regulation": {
        "current_phrasing": string,      // How are emotions currently being regulated in the message?
        "improvement_examples": string,  // Specific suggestions for better emotional regulation
        "alternative_phrases": string    // Alternative ways to express the same message with better regulation
    },
    "empathy": {
        "missing_elements": string,      // What empathetic elements are missing?
        "potential_additions": string,   // How could more empathy be added?
        "understanding_examples": string // Examples of more empathetic approaches
    },
    "social_skills": {
        "current_impact": string,        // How does the message affect social dynamics?
        "improvements": string,          // Suggestions for improving social impact
        "examples": string               // Examples of better social approaches
    }
}

Remember to be specific and provide concrete examples in your analysis."#;

/// Which of the two calls a prompt is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Analysis,
    Rewrite,
}

impl PromptKind {
    /// Calls needed for a mode, in issue order
    pub fn for_mode(mode: Mode) -> &'static [PromptKind] {
        match mode {
            Mode::Analyze => &[PromptKind::Analysis, PromptKind::Rewrite],
            Mode::Rewrite => &[PromptKind::Rewrite],
        }
    }

    fn base(self) -> &'static str {
        match self {
            PromptKind::Analysis => ANALYZE_PROMPT,
            PromptKind::Rewrite => REWRITE_PROMPT,
        }
    }
}

/// System prompt for `kind`, with a reply-language instruction when not English
pub fn system_prompt(kind: PromptKind, language: Language) -> String {
    let mut prompt = kind.base().to_string();

    if let Some(instruction) = language.reply_instruction() {
        prompt.push_str("\n\n");
        prompt.push_str(instruction);
    }

    prompt
}
