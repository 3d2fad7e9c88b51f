//! Configuration surface
//!
//! Read once at process start and passed down as an immutable value.
//! Every threshold here is a tuning default, not a validated invariant;
//! deployments override them through the usual key/value config file.

use serde::{Deserialize, Serialize};

use crate::services::taxonomy::Taxonomy;

/// Index boundary constants and reoptimization drift thresholds.
///
/// The optimizer takes an immutable copy per planning cycle; there is
/// no shared mutable "current strategy" state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTuning {
    /// At or below this row count, sequential scan wins
    #[serde(default = "default_scan_ceiling")]
    pub scan_ceiling: u64,
    /// Upper bound for the basic flat-clustered tier
    #[serde(default = "default_flat_ceiling")]
    pub flat_ceiling: u64,
    /// Upper bound for the distribution-tuned flat-clustered tier
    #[serde(default = "default_tuned_ceiling")]
    pub tuned_ceiling: u64,
    /// Upper bound for the partitioned tier; above this, graph-based
    #[serde(default = "default_partition_ceiling")]
    pub partition_ceiling: u64,
    /// Heavy/power user fraction above which probe counts are raised
    #[serde(default = "default_power_user_fraction")]
    pub power_user_fraction: f64,
    /// Partition by user only when the user population is below this
    #[serde(default = "default_partition_user_limit")]
    pub partition_user_limit: u64,
    /// Row growth fraction that triggers reoptimization
    #[serde(default = "default_growth_trigger")]
    pub growth_trigger: f64,
    /// Latency degradation fraction that triggers reoptimization
    #[serde(default = "default_latency_trigger")]
    pub latency_trigger: f64,
}

fn default_scan_ceiling() -> u64 {
    1_000
}

fn default_flat_ceiling() -> u64 {
    10_000
}

fn default_tuned_ceiling() -> u64 {
    100_000
}

fn default_partition_ceiling() -> u64 {
    500_000
}

fn default_power_user_fraction() -> f64 {
    0.2
}

fn default_partition_user_limit() -> u64 {
    1_000
}

fn default_growth_trigger() -> f64 {
    0.5
}

fn default_latency_trigger() -> f64 {
    0.3
}

impl Default for IndexTuning {
    fn default() -> Self {
        Self {
            scan_ceiling: default_scan_ceiling(),
            flat_ceiling: default_flat_ceiling(),
            tuned_ceiling: default_tuned_ceiling(),
            partition_ceiling: default_partition_ceiling(),
            power_user_fraction: default_power_user_fraction(),
            partition_user_limit: default_partition_user_limit(),
            growth_trigger: default_growth_trigger(),
            latency_trigger: default_latency_trigger(),
        }
    }
}

/// Top-level configuration for the memory core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemoConfig {
    /// Embedding dimensionality contract with the model collaborator
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
    /// Content length (chars) beyond which the summary format is used
    #[serde(default = "default_summary_cutoff")]
    pub summary_cutoff: usize,
    /// Content length (bytes) that routes to the large-content strategy
    #[serde(default = "default_large_content_cutoff")]
    pub large_content_cutoff: usize,
    /// TTL for the temporary (cache-first) strategy, seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Backoff before the single storage retry, milliseconds
    #[serde(default = "default_store_retry_backoff_ms")]
    pub store_retry_backoff_ms: u64,
    /// Retrieval deadline, milliseconds; a timeout degrades to no context
    #[serde(default = "default_retrieval_timeout_ms")]
    pub retrieval_timeout_ms: u64,
    /// Result limit for recall-question retrieval
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,
    /// Result limit for general semantic retrieval
    #[serde(default = "default_semantic_limit")]
    pub semantic_limit: usize,
    /// Classification confidence below this falls back to default leaves
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,
    #[serde(default)]
    pub index: IndexTuning,
    /// Type tree override; the built-in taxonomy is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
}

fn default_embedding_dimension() -> usize {
    1024
}

fn default_summary_cutoff() -> usize {
    500
}

fn default_large_content_cutoff() -> usize {
    1_000
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

fn default_store_retry_backoff_ms() -> u64 {
    250
}

fn default_retrieval_timeout_ms() -> u64 {
    3_000
}

fn default_recall_limit() -> usize {
    10
}

fn default_semantic_limit() -> usize {
    5
}

fn default_confidence_floor() -> f64 {
    0.1
}

impl Default for MnemoConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: default_embedding_dimension(),
            summary_cutoff: default_summary_cutoff(),
            large_content_cutoff: default_large_content_cutoff(),
            cache_ttl_secs: default_cache_ttl_secs(),
            store_retry_backoff_ms: default_store_retry_backoff_ms(),
            retrieval_timeout_ms: default_retrieval_timeout_ms(),
            recall_limit: default_recall_limit(),
            semantic_limit: default_semantic_limit(),
            confidence_floor: default_confidence_floor(),
            index: IndexTuning::default(),
            taxonomy: None,
        }
    }
}
