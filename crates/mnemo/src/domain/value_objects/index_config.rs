//! IndexConfiguration - vector-search index kind and tuning parameters

use serde::{Deserialize, Serialize};

/// Recommended vector index shape for the current corpus.
///
/// Re-derivable from corpus statistics: the same statistics always
/// produce the same configuration, so applying it twice is a no-op for
/// the database collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IndexConfiguration {
    /// Sequential scan; the corpus is too small for an index to pay off.
    None,
    /// Flat clustered index (IVF-style): `clusters` partitions, probing
    /// `probes` of them per query.
    FlatClustered { clusters: u64, probes: u32 },
    /// Flat clustered index partitioned by user id, for corpora where a
    /// small user population owns most rows.
    FlatClusteredPartitioned {
        clusters_per_partition: u64,
        probes: u32,
    },
    /// Graph-based index (HNSW-style).
    Graph {
        neighbor_degree: u32,
        construction_quality: u32,
        search_quality: u32,
    },
}

impl IndexConfiguration {
    /// Build/maintenance complexity rank. Partitioned and graph indexes
    /// sit at the same level: both are the heavyweight tier.
    pub fn complexity(&self) -> u8 {
        match self {
            IndexConfiguration::None => 0,
            IndexConfiguration::FlatClustered { .. } => 1,
            IndexConfiguration::FlatClusteredPartitioned { .. } => 2,
            IndexConfiguration::Graph { .. } => 2,
        }
    }
}

impl std::fmt::Display for IndexConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexConfiguration::None => write!(f, "none"),
            IndexConfiguration::FlatClustered { clusters, probes } => {
                write!(f, "flat_clustered(clusters={}, probes={})", clusters, probes)
            }
            IndexConfiguration::FlatClusteredPartitioned {
                clusters_per_partition,
                probes,
            } => write!(
                f,
                "flat_clustered_partitioned(clusters={}, probes={})",
                clusters_per_partition, probes
            ),
            IndexConfiguration::Graph {
                neighbor_degree,
                construction_quality,
                search_quality,
            } => write!(
                f,
                "graph(m={}, build={}, search={})",
                neighbor_degree, construction_quality, search_quality
            ),
        }
    }
}
