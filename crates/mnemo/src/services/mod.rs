pub mod classifier;
pub mod index_optimizer;
pub mod processor;
pub mod strategy;
pub mod taxonomy;

pub use classifier::{Classification, HierarchicalClassifier};
pub use index_optimizer::{IndexOptimizer, OptimizationSnapshot};
pub use processor::{ContentProcessor, Entity, ProcessedContent};
pub use strategy::StorageStrategySelector;
pub use taxonomy::{Taxonomy, TaxonomyNode};
