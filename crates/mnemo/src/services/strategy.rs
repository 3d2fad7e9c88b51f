//! Storage Strategy Selector
//!
//! Derives a placement plan from (type path, importance, content size).
//! Pure: the same inputs always produce the same strategy. The cost
//! figure is reporting-only and never feeds back into routing.

use std::time::Duration;

use crate::domain::value_objects::{
    CostEstimate, MajorType, StorageLocation, StorageStrategy, TypePath,
};

pub struct StorageStrategySelector {
    /// Content size (bytes) that routes to the large-content plan
    large_content_cutoff: usize,
    /// TTL for the cache-first temporary plan
    cache_ttl: Duration,
}

/// Importance at which personal memories get the high-value treatment.
const HIGH_VALUE_IMPORTANCE: f64 = 8.0;

impl StorageStrategySelector {
    pub fn new(large_content_cutoff: usize, cache_ttl: Duration) -> Self {
        Self {
            large_content_cutoff,
            cache_ttl,
        }
    }

    /// Select a placement plan. Rules are evaluated in priority order;
    /// the first match wins.
    pub fn select(&self, path: &TypePath, importance: f64, content_size: usize) -> StorageStrategy {
        // 1. High-value personal memories stay hot: database + cache.
        if path.major == MajorType::Personal && importance >= HIGH_VALUE_IMPORTANCE {
            return self.build(
                StorageLocation::Database,
                vec![StorageLocation::Cache],
                true,
                false,
                None,
                content_size,
            );
        }

        // 2. Conversation turns: plain database rows with embeddings.
        if path.major == MajorType::Temporal && path.minor == "conversation" {
            return self.build(
                StorageLocation::Database,
                vec![],
                true,
                false,
                None,
                content_size,
            );
        }

        // 3. Ephemeral context: cache-first with a TTL, database backup.
        if path.major == MajorType::Temporal && path.minor == "context" {
            return self.build(
                StorageLocation::Cache,
                vec![StorageLocation::Database],
                false,
                false,
                Some(self.cache_ttl),
                content_size,
            );
        }

        // 4. Large content: compressed, with a cold-archive copy.
        if content_size > self.large_content_cutoff {
            return self.build(
                StorageLocation::Database,
                vec![StorageLocation::Archive],
                true,
                true,
                None,
                content_size,
            );
        }

        // 5. Default: database row with embedding.
        self.build(
            StorageLocation::Database,
            vec![],
            true,
            false,
            None,
            content_size,
        )
    }

    fn build(
        &self,
        primary: StorageLocation,
        secondary: Vec<StorageLocation>,
        include_embedding: bool,
        compress: bool,
        ttl: Option<Duration>,
        content_size: usize,
    ) -> StorageStrategy {
        let cost: CostEstimate = StorageStrategy::estimate_cost(
            primary,
            &secondary,
            include_embedding,
            compress,
            content_size,
        );
        StorageStrategy {
            primary,
            secondary,
            include_embedding,
            compress,
            ttl,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> StorageStrategySelector {
        StorageStrategySelector::new(1_000, Duration::from_secs(86_400))
    }

    #[test]
    fn test_high_value_personal_gets_cache_tier() {
        let path = TypePath::new(MajorType::Personal, "identity", "name");
        let strategy = selector().select(&path, 9.0, 100);
        assert_eq!(strategy.primary, StorageLocation::Database);
        assert_eq!(strategy.secondary, vec![StorageLocation::Cache]);
        assert!(strategy.include_embedding);
        assert!(!strategy.compress);
    }

    #[test]
    fn test_conversation_is_plain_database() {
        let path = TypePath::new(MajorType::Temporal, "conversation", "question");
        let strategy = selector().select(&path, 7.0, 100);
        assert_eq!(strategy.primary, StorageLocation::Database);
        assert!(strategy.secondary.is_empty());
        assert!(strategy.include_embedding);
    }

    #[test]
    fn test_temporary_context_is_cache_first_with_ttl() {
        let path = TypePath::new(MajorType::Temporal, "context", "session");
        let strategy = selector().select(&path, 4.0, 100);
        assert_eq!(strategy.primary, StorageLocation::Cache);
        assert_eq!(strategy.secondary, vec![StorageLocation::Database]);
        assert!(!strategy.include_embedding);
        assert_eq!(strategy.ttl, Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn test_large_content_compressed_and_archived() {
        let path = TypePath::new(MajorType::Knowledge, "experience", "work");
        let strategy = selector().select(&path, 6.0, 5_000);
        assert_eq!(strategy.secondary, vec![StorageLocation::Archive]);
        assert!(strategy.compress);
    }

    #[test]
    fn test_default_plan() {
        let path = TypePath::new(MajorType::Knowledge, "fact", "general");
        let strategy = selector().select(&path, 5.0, 200);
        assert_eq!(strategy.primary, StorageLocation::Database);
        assert!(strategy.secondary.is_empty());
        assert!(strategy.include_embedding);
        assert!(!strategy.compress);
    }

    #[test]
    fn test_selection_is_pure() {
        let path = TypePath::new(MajorType::Personal, "preference", "music");
        let s = selector();
        let a = s.select(&path, 6.5, 321);
        let b = s.select(&path, 6.5, 321);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cost_grows_with_size_and_tiers() {
        let s = selector();
        let personal = TypePath::new(MajorType::Personal, "identity", "name");
        let fact = TypePath::new(MajorType::Knowledge, "fact", "general");

        let tiered = s.select(&personal, 9.0, 100);
        let flat = s.select(&fact, 5.0, 100);
        assert!(tiered.cost.monthly > flat.cost.monthly);

        let small = s.select(&fact, 5.0, 100);
        let big = s.select(&fact, 5.0, 900);
        assert!(big.cost.monthly > small.cost.monthly);
        assert!(small.cost.query < small.cost.storage);
    }
}
