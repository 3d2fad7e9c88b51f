//! TypePath - hierarchical classification of a memory

use serde::{Deserialize, Serialize};

/// Top-level memory category. Closed set: records never carry a major
/// category outside these three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MajorType {
    Personal,
    Knowledge,
    Temporal,
}

impl std::fmt::Display for MajorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MajorType::Personal => write!(f, "personal"),
            MajorType::Knowledge => write!(f, "knowledge"),
            MajorType::Temporal => write!(f, "temporal"),
        }
    }
}

impl std::str::FromStr for MajorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(MajorType::Personal),
            "knowledge" => Ok(MajorType::Knowledge),
            "temporal" => Ok(MajorType::Temporal),
            _ => Err(format!("Unknown major type: {}", s)),
        }
    }
}

/// Ordered (major, minor, detail) classification, rendered as
/// `major/minor/detail` (e.g. `personal/identity/name`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypePath {
    pub major: MajorType,
    pub minor: String,
    pub detail: String,
}

impl TypePath {
    pub fn new(major: MajorType, minor: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            major,
            minor: minor.into(),
            detail: detail.into(),
        }
    }

    /// Default leaf used when classification finds nothing at all.
    pub fn default_leaf() -> Self {
        Self::new(MajorType::Temporal, "conversation", "statement")
    }
}

impl std::fmt::Display for TypePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.major, self.minor, self.detail)
    }
}

/// Prefix over type paths, used by retrieval filters. A prefix with
/// only a major component matches every path under that category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypePrefix {
    pub major: MajorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<String>,
}

impl TypePrefix {
    pub fn major(major: MajorType) -> Self {
        Self { major, minor: None }
    }

    pub fn minor(major: MajorType, minor: impl Into<String>) -> Self {
        Self {
            major,
            minor: Some(minor.into()),
        }
    }

    pub fn matches(&self, path: &TypePath) -> bool {
        if self.major != path.major {
            return false;
        }
        match &self.minor {
            Some(minor) => minor == &path.minor,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_renders_as_slash_separated() {
        let path = TypePath::new(MajorType::Personal, "identity", "name");
        assert_eq!(path.to_string(), "personal/identity/name");
    }

    #[test]
    fn test_prefix_matching() {
        let path = TypePath::new(MajorType::Temporal, "conversation", "question");
        assert!(TypePrefix::major(MajorType::Temporal).matches(&path));
        assert!(TypePrefix::minor(MajorType::Temporal, "conversation").matches(&path));
        assert!(!TypePrefix::minor(MajorType::Temporal, "context").matches(&path));
        assert!(!TypePrefix::major(MajorType::Personal).matches(&path));
    }
}
