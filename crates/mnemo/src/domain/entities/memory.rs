//! MemoryRecord - a stored piece of conversational memory
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{StorageFormat, TypePath};

/// A single memory owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier for the memory
    pub id: Uuid,
    /// Owning user
    pub user_id: String,
    /// Conversation session the memory was captured in, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The content/text of the memory
    pub content: String,
    /// Embedding vector; when present its length must match the active
    /// embedding model's dimensionality for the whole collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Hierarchical classification (major/minor/detail)
    pub type_path: TypePath,
    /// Importance score, clamped to [0.0, 10.0]
    pub importance: f64,
    /// How the content is persisted
    pub storage_format: StorageFormat,
    /// Additional metadata (entities, keywords, intent, original text)
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// When this memory was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Create a new record with generated id and timestamps. Importance
    /// is clamped into range on construction.
    pub fn new(
        user_id: impl Into<String>,
        session_id: Option<String>,
        content: impl Into<String>,
        type_path: TypePath,
        importance: f64,
        storage_format: StorageFormat,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            session_id,
            content: content.into(),
            embedding: None,
            type_path,
            importance: importance.clamp(0.0, 10.0),
            storage_format,
            metadata: serde_json::Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::MajorType;

    #[test]
    fn test_importance_clamped_on_construction() {
        let path = TypePath::new(MajorType::Personal, "identity", "name");
        let high = MemoryRecord::new("u1", None, "x", path.clone(), 42.0, StorageFormat::Full);
        assert_eq!(high.importance, 10.0);
        let low = MemoryRecord::new("u1", None, "x", path, -3.0, StorageFormat::Full);
        assert_eq!(low.importance, 0.0);
    }
}
