//! MemoryEvent - lifecycle notification for memory operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to a memory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryEventKind {
    Created,
    Updated,
    Deleted,
    Retrieved,
}

/// Fire-and-forget notification emitted once per committed storage or
/// retrieval action. Delivery is at-most-once: subscribers attached at
/// emission time receive it, nobody else ever will.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub kind: MemoryEventKind,
    /// Subject record, absent for retrieval events that cover a result set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<Uuid>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Snapshot of whatever the action produced (content, result count)
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl MemoryEvent {
    pub fn new(kind: MemoryEventKind, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            memory_id: None,
            user_id: user_id.into(),
            session_id: None,
            timestamp: Utc::now(),
            payload: serde_json::Map::new(),
        }
    }

    pub fn with_memory_id(mut self, id: Uuid) -> Self {
        self.memory_id = Some(id);
        self
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_payload(mut self, key: &str, value: serde_json::Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }
}
