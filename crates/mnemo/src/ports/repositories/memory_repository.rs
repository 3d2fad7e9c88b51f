//! Memory Repository Port
//!
//! Abstract interface for the database collaborator: vector storage,
//! nearest-neighbor search, index maintenance, and corpus statistics.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::MemoryError, IndexConfiguration, MemoryRecord, RetrievalWeighting, TypePrefix,
};

/// Search filter for memory queries.
#[derive(Debug, Default, Clone)]
pub struct MemorySearchFilter {
    /// Owning user; retrieval is always user-scoped
    pub user_id: String,
    /// Restrict to one conversation session
    pub session_id: Option<String>,
    /// Type-path prefix (e.g. everything under temporal/conversation)
    pub type_filter: Option<TypePrefix>,
    /// Minimum importance score
    pub min_importance: Option<f64>,
}

/// One retrieval request against the collaborator.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Query embedding; `None` asks for a pure recency scan
    pub embedding: Option<Vec<f32>>,
    pub filter: MemorySearchFilter,
    pub limit: usize,
    pub weighting: RetrievalWeighting,
}

/// Per-user activity histogram: how many users fall into each memory
/// count bucket (light <10, medium 10-100, heavy 100-1000, power >1000).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityHistogram {
    pub light: u64,
    pub medium: u64,
    pub heavy: u64,
    pub power: u64,
}

impl ActivityHistogram {
    pub fn total_users(&self) -> u64 {
        self.light + self.medium + self.heavy + self.power
    }

    /// Fraction of users in the heavy and power buckets. These are the
    /// users whose query accuracy the index must not sacrifice.
    pub fn power_fraction(&self) -> f64 {
        let total = self.total_users();
        if total == 0 {
            return 0.0;
        }
        (self.heavy + self.power) as f64 / total as f64
    }
}

/// Aggregate corpus statistics reported by the database collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CorpusStatistics {
    pub row_count: u64,
    pub unique_users: u64,
    pub activity: ActivityHistogram,
    pub avg_query_latency_ms: f64,
}

/// Repository interface for memory records.
///
/// Implementations wrap the external vector database. Writes are
/// serialized per record id by the collaborator; `apply_index_configuration`
/// is idempotent and may run concurrently with read/write traffic.
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Persist a record (content, embedding, metadata), returning its id
    async fn insert(&self, record: &MemoryRecord) -> Result<Uuid, MemoryError>;

    /// Nearest-neighbor search with type-path and user/session scoping,
    /// ranked best-first
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MemoryRecord>, MemoryError>;

    /// Apply a recommended index configuration. Applying the current
    /// configuration again is a no-op.
    async fn apply_index_configuration(
        &self,
        config: &IndexConfiguration,
    ) -> Result<(), MemoryError>;

    /// Current corpus statistics for index planning
    async fn statistics(&self) -> Result<CorpusStatistics, MemoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_fraction() {
        let hist = ActivityHistogram {
            light: 70,
            medium: 20,
            heavy: 6,
            power: 4,
        };
        assert!((hist.power_fraction() - 0.1).abs() < 1e-9);
        assert_eq!(ActivityHistogram::default().power_fraction(), 0.0);
    }
}
