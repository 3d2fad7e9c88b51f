//! StorageStrategy - placement plan for a record
//!
//! Strategies are derived per record from (type path, importance,
//! content size) and never persisted.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a record can live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    Database,
    Cache,
    Archive,
}

impl StorageLocation {
    /// Relative monthly cost per unit of content. Cache is RAM-priced,
    /// archive is cold storage.
    pub fn unit_cost(&self) -> f64 {
        match self {
            StorageLocation::Database => 1.0,
            StorageLocation::Cache => 3.0,
            StorageLocation::Archive => 0.3,
        }
    }
}

/// Estimated cost of keeping a record under a strategy. Reporting only,
/// never consulted for routing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostEstimate {
    pub storage: f64,
    pub query: f64,
    pub monthly: f64,
}

/// Placement plan: primary store, optional secondary tiers, and the
/// embedding/compression flags the writer should honor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageStrategy {
    pub primary: StorageLocation,
    pub secondary: Vec<StorageLocation>,
    pub include_embedding: bool,
    pub compress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
    pub cost: CostEstimate,
}

impl StorageStrategy {
    /// Linear cost model: location base costs with secondary tiers at
    /// half weight, a surcharge for embedding generation, a compression
    /// discount, scaled by content size in KB and projected to a month.
    pub fn estimate_cost(
        primary: StorageLocation,
        secondary: &[StorageLocation],
        include_embedding: bool,
        compress: bool,
        content_size: usize,
    ) -> CostEstimate {
        let mut base = primary.unit_cost();
        for tier in secondary {
            base += tier.unit_cost() * 0.5;
        }
        if include_embedding {
            base += 0.5;
        }
        if compress {
            base *= 0.7;
        }
        let size_factor = content_size as f64 / 1024.0;
        let storage = base * (1.0 + size_factor * 0.1);
        CostEstimate {
            storage,
            query: storage * 0.1,
            monthly: storage * 1.1 * 30.0,
        }
    }
}
