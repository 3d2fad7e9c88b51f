//! Intent - what the user is doing with a message

use serde::{Deserialize, Serialize};

/// Message intent, detected alongside classification during the
/// `received -> understood` transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Acknowledgment,
    /// Question about something said earlier in the conversation.
    RecallQuestion,
    InformationSharing,
    GeneralQuery,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Greeting => write!(f, "greeting"),
            Intent::Acknowledgment => write!(f, "acknowledgment"),
            Intent::RecallQuestion => write!(f, "recall_question"),
            Intent::InformationSharing => write!(f, "information_sharing"),
            Intent::GeneralQuery => write!(f, "general_query"),
        }
    }
}

/// Detected message language, recorded in understanding metadata so the
/// response prompt can mirror the user's language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Korean,
    English,
}

impl Language {
    /// Hangul syllables or jamo anywhere in the text mean Korean.
    pub fn detect(text: &str) -> Self {
        let korean = text
            .chars()
            .any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c) || ('\u{3131}'..='\u{318E}').contains(&c));
        if korean {
            Language::Korean
        } else {
            Language::English
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(Language::detect("안녕하세요"), Language::Korean);
        assert_eq!(Language::detect("hello there"), Language::English);
        assert_eq!(Language::detect("Python 개발자"), Language::Korean);
    }
}
