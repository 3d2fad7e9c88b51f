//! Vector Index Optimizer
//!
//! Recommends an index configuration from corpus statistics and
//! decides when drift justifies reoptimizing. Recommendations are
//! pure and idempotent; executing a reindex belongs to the database
//! collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::IndexTuning;
use crate::domain::value_objects::IndexConfiguration;
use crate::ports::repositories::CorpusStatistics;

/// Immutable baseline captured when a configuration is applied. Each
/// optimization cycle compares fresh statistics against its own
/// snapshot; there is no shared mutable current-strategy state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationSnapshot {
    pub row_count: u64,
    pub avg_query_latency_ms: f64,
    pub power_user_fraction: f64,
    pub config: IndexConfiguration,
    pub taken_at: DateTime<Utc>,
}

pub struct IndexOptimizer {
    tuning: IndexTuning,
}

impl IndexOptimizer {
    pub fn new(tuning: IndexTuning) -> Self {
        Self { tuning }
    }

    /// Derive the index configuration for the given statistics.
    ///
    /// Ordered decision table on row count; rows sitting exactly on a
    /// boundary take the lower-complexity side (index-build cost beats
    /// marginal recall there). Deterministic and monotone: growing the
    /// corpus never moves to a simpler index kind.
    pub fn recommend(&self, stats: &CorpusStatistics) -> IndexConfiguration {
        let rows = stats.row_count;
        let t = &self.tuning;

        if rows <= t.scan_ceiling {
            return IndexConfiguration::None;
        }

        if rows <= t.flat_ceiling {
            return IndexConfiguration::FlatClustered {
                clusters: (rows / 1_000).max(8),
                probes: 5,
            };
        }

        if rows <= t.tuned_ceiling {
            // Heavy/power users need accuracy; a light crowd can trade
            // recall for speed.
            let power_fraction = stats.activity.power_fraction();
            return if power_fraction > t.power_user_fraction {
                IndexConfiguration::FlatClustered {
                    clusters: (rows / 500).max(50),
                    probes: 20,
                }
            } else {
                IndexConfiguration::FlatClustered {
                    clusters: (rows / 1_000).max(30),
                    probes: 10,
                }
            };
        }

        if rows <= t.partition_ceiling {
            // Few users with lots of rows: partition by user for
            // locality. Broad user bases go straight to graph.
            return if stats.unique_users < t.partition_user_limit {
                IndexConfiguration::FlatClusteredPartitioned {
                    clusters_per_partition: 100,
                    probes: 15,
                }
            } else {
                IndexConfiguration::Graph {
                    neighbor_degree: 16,
                    construction_quality: 200,
                    search_quality: 100,
                }
            };
        }

        IndexConfiguration::Graph {
            neighbor_degree: 32,
            construction_quality: 400,
            search_quality: 100,
        }
    }

    /// Whether fresh statistics have drifted enough from the snapshot
    /// to warrant a reindex: row growth past the trigger, query latency
    /// degraded past the trigger, the power-user fraction crossing its
    /// threshold in either direction, or a manual override.
    pub fn should_reoptimize(
        &self,
        stats: &CorpusStatistics,
        snapshot: &OptimizationSnapshot,
        force: bool,
    ) -> bool {
        if force {
            return true;
        }
        let t = &self.tuning;

        let grown = stats.row_count as f64 >= snapshot.row_count as f64 * (1.0 + t.growth_trigger);
        if grown {
            tracing::debug!(
                rows = stats.row_count,
                baseline = snapshot.row_count,
                "row growth crossed reoptimization trigger"
            );
            return true;
        }

        if snapshot.avg_query_latency_ms > 0.0
            && stats.avg_query_latency_ms
                >= snapshot.avg_query_latency_ms * (1.0 + t.latency_trigger)
        {
            tracing::debug!(
                latency_ms = stats.avg_query_latency_ms,
                baseline_ms = snapshot.avg_query_latency_ms,
                "query latency crossed reoptimization trigger"
            );
            return true;
        }

        let was_power_heavy = snapshot.power_user_fraction > t.power_user_fraction;
        let is_power_heavy = stats.activity.power_fraction() > t.power_user_fraction;
        was_power_heavy != is_power_heavy
    }

    /// Capture the baseline for the next drift check after a
    /// configuration has been applied.
    pub fn snapshot(
        &self,
        stats: &CorpusStatistics,
        config: IndexConfiguration,
    ) -> OptimizationSnapshot {
        OptimizationSnapshot {
            row_count: stats.row_count,
            avg_query_latency_ms: stats.avg_query_latency_ms,
            power_user_fraction: stats.activity.power_fraction(),
            config,
            taken_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::repositories::ActivityHistogram;

    fn optimizer() -> IndexOptimizer {
        IndexOptimizer::new(IndexTuning::default())
    }

    fn stats(rows: u64, users: u64, activity: ActivityHistogram) -> CorpusStatistics {
        CorpusStatistics {
            row_count: rows,
            unique_users: users,
            activity,
            avg_query_latency_ms: 10.0,
        }
    }

    fn light_crowd(users: u64) -> ActivityHistogram {
        ActivityHistogram {
            light: users,
            medium: 0,
            heavy: 0,
            power: 0,
        }
    }

    #[test]
    fn test_small_corpus_scans_sequentially() {
        let opt = optimizer();
        let config = opt.recommend(&stats(500, 10, light_crowd(10)));
        assert_eq!(config, IndexConfiguration::None);
    }

    #[test]
    fn test_boundary_rows_prefer_lower_complexity() {
        let opt = optimizer();
        assert_eq!(
            opt.recommend(&stats(1_000, 10, light_crowd(10))),
            IndexConfiguration::None
        );
        assert_eq!(
            opt.recommend(&stats(10_000, 50, light_crowd(50))),
            IndexConfiguration::FlatClustered {
                clusters: 10,
                probes: 5
            }
        );
    }

    #[test]
    fn test_medium_corpus_tuned_by_user_distribution() {
        let opt = optimizer();
        let light = stats(50_000, 100, light_crowd(100));
        assert_eq!(
            opt.recommend(&light),
            IndexConfiguration::FlatClustered {
                clusters: 50,
                probes: 10
            }
        );

        let heavy = stats(
            50_000,
            100,
            ActivityHistogram {
                light: 60,
                medium: 10,
                heavy: 20,
                power: 10,
            },
        );
        assert_eq!(
            opt.recommend(&heavy),
            IndexConfiguration::FlatClustered {
                clusters: 100,
                probes: 20
            }
        );
    }

    #[test]
    fn test_large_corpus_partitions_for_few_users() {
        let opt = optimizer();
        let config = opt.recommend(&stats(300_000, 200, light_crowd(200)));
        assert_eq!(
            config,
            IndexConfiguration::FlatClusteredPartitioned {
                clusters_per_partition: 100,
                probes: 15
            }
        );

        let broad = opt.recommend(&stats(300_000, 5_000, light_crowd(5_000)));
        assert!(matches!(broad, IndexConfiguration::Graph { .. }));
    }

    #[test]
    fn test_600k_rows_with_five_percent_power_users_is_graph() {
        let opt = optimizer();
        let activity = ActivityHistogram {
            light: 950,
            medium: 0,
            heavy: 0,
            power: 50,
        };
        let config = opt.recommend(&stats(600_000, 1_000, activity));
        assert_eq!(
            config,
            IndexConfiguration::Graph {
                neighbor_degree: 32,
                construction_quality: 400,
                search_quality: 100
            }
        );
    }

    #[test]
    fn test_recommendation_monotone_in_row_count() {
        let opt = optimizer();
        let mut last_complexity = 0;
        for rows in [100, 1_000, 5_000, 10_000, 50_000, 100_000, 400_000, 600_000, 2_000_000] {
            let users = (rows / 100).max(1);
            let config = opt.recommend(&stats(rows, users, light_crowd(users)));
            assert!(
                config.complexity() >= last_complexity,
                "complexity dropped at {} rows: {}",
                rows,
                config
            );
            last_complexity = config.complexity();
        }
    }

    #[test]
    fn test_idempotent_recommendation() {
        let opt = optimizer();
        let s = stats(42_000, 300, light_crowd(300));
        assert_eq!(opt.recommend(&s), opt.recommend(&s));
    }

    fn snapshot_at(rows: u64, latency: f64, power_fraction: f64) -> OptimizationSnapshot {
        OptimizationSnapshot {
            row_count: rows,
            avg_query_latency_ms: latency,
            power_user_fraction: power_fraction,
            config: IndexConfiguration::FlatClustered {
                clusters: 10,
                probes: 5,
            },
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn test_reoptimize_on_sixty_percent_growth_but_not_ten() {
        let opt = optimizer();
        let snapshot = snapshot_at(10_000, 10.0, 0.0);

        let grown = stats(16_000, 100, light_crowd(100));
        assert!(opt.should_reoptimize(&grown, &snapshot, false));

        let barely = stats(11_000, 100, light_crowd(100));
        assert!(!opt.should_reoptimize(&barely, &snapshot, false));
    }

    #[test]
    fn test_reoptimize_on_latency_degradation() {
        let opt = optimizer();
        let snapshot = snapshot_at(10_000, 10.0, 0.0);
        let mut slow = stats(10_000, 100, light_crowd(100));
        slow.avg_query_latency_ms = 14.0;
        assert!(opt.should_reoptimize(&slow, &snapshot, false));

        slow.avg_query_latency_ms = 11.0;
        assert!(!opt.should_reoptimize(&slow, &snapshot, false));
    }

    #[test]
    fn test_reoptimize_on_power_fraction_crossing_either_direction() {
        let opt = optimizer();
        let crossing_up = stats(
            10_000,
            100,
            ActivityHistogram {
                light: 70,
                medium: 0,
                heavy: 0,
                power: 30,
            },
        );
        assert!(opt.should_reoptimize(&crossing_up, &snapshot_at(10_000, 10.0, 0.1), false));

        let crossing_down = stats(10_000, 100, light_crowd(100));
        assert!(opt.should_reoptimize(&crossing_down, &snapshot_at(10_000, 10.0, 0.5), false));

        let steady = stats(10_000, 100, light_crowd(100));
        assert!(!opt.should_reoptimize(&steady, &snapshot_at(10_000, 10.0, 0.1), false));
    }

    #[test]
    fn test_manual_override_always_reoptimizes() {
        let opt = optimizer();
        let s = stats(10_000, 100, light_crowd(100));
        assert!(opt.should_reoptimize(&s, &snapshot_at(10_000, 10.0, 0.1), true));
    }
}
