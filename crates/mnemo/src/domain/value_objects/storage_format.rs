//! StorageFormat - how a record's content is persisted

use serde::{Deserialize, Serialize};

/// Persisted representation of a record's content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    /// Verbatim content.
    #[default]
    Full,
    /// Condensed fact statement built around extracted entities.
    Structured,
    /// Structured entities serialized alongside the original text.
    Json,
    /// Content replaced by its generated summary.
    Summary,
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageFormat::Full => write!(f, "full"),
            StorageFormat::Structured => write!(f, "structured"),
            StorageFormat::Json => write!(f, "json"),
            StorageFormat::Summary => write!(f, "summary"),
        }
    }
}
