//! Reply language detection from the script of the input

/// Language the model is asked to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Russian,
    Ukrainian,
}

impl Language {
    /// Ukrainian-only letters win over generic Cyrillic, anything else is English.
    pub fn detect(text: &str) -> Self {
        let mut cyrillic = false;

        for c in text.chars() {
            if matches!(c, 'і' | 'ї' | 'є' | 'ґ' | 'І' | 'Ї' | 'Є' | 'Ґ') {
                return Language::Ukrainian;
            }

            if ('\u{0400}'..='\u{04FF}').contains(&c) {
                cyrillic = true;
            }
        }

        if cyrillic {
            Language::Russian
        } else {
            Language::English
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
            Language::Ukrainian => "uk",
        }
    }

    pub fn reply_instruction(&self) -> Option<&'static str> {
        match self {
            Language::English => None,
            Language::Russian => Some(
                "IMPORTANT: Respond in Russian (на русском языке) as the input message is in Russian.",
            ),
            Language::Ukrainian => Some(
                "IMPORTANT: Respond in Ukrainian (українською мовою) as the input message is in Ukrainian.",
            ),
        }
    }
}
