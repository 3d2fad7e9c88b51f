//! DecisionPlan - per-message memory policy
//!
//! Constructed fresh for every inbound message, consumed immediately by
//! the planner, never persisted.

use serde::{Deserialize, Serialize};

use super::storage_strategy::StorageStrategy;
use super::type_path::TypePrefix;

/// How retrieval results are ranked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalWeighting {
    /// Favor recently created memories (recall of the conversation).
    Recency,
    /// Favor embedding similarity (general context lookup).
    Semantic,
}

/// What to fetch when a plan calls for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalStrategy {
    /// Restrict to a type-path subtree; `None` searches all types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_filter: Option<TypePrefix>,
    pub limit: usize,
    pub weighting: RetrievalWeighting,
}

/// The three independent decisions for one message, plus the strategies
/// backing the enabled ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionPlan {
    pub needs_retrieval: bool,
    pub needs_response: bool,
    pub should_store: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageStrategy>,
}
