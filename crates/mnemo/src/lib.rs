//! Mnemo - autonomous long-term memory core for conversational agents
//!
//! Classifies inbound messages into a hierarchical type tree, extracts
//! structured content, decides per message whether to retrieve, store,
//! and respond, and tunes the backing vector index as the corpus grows.
//! The database and model collaborators stay behind ports; this crate
//! never talks to the network itself.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (MemoryRecord, MemoryEvent)
//!   - `value_objects/`: Immutable value types (TypePath, DecisionPlan,
//!     StorageStrategy, IndexConfiguration)
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Vector storage and statistics interface
//!   - `services/`: Embedding and completion model interfaces
//!
//! - **Services** (`services/`): Pure decision components
//!   (classifier, content processor, storage strategy selector,
//!   index optimizer, loadable taxonomy)
//!
//! - **Application** (`application/`): Orchestration over the ports
//!   (turn planner, index maintenance, event fan-out)
//!
//! # Usage
//!
//! ```rust,ignore
//! use mnemo::application::{DecisionPlanner, EventEmitter, TurnRequest};
//! use mnemo::config::MnemoConfig;
//!
//! let planner = DecisionPlanner::new(repo, embedder, completer, emitter, MnemoConfig::default())?;
//! let outcome = planner.handle_turn(TurnRequest { /* ... */ }).await?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use application::{DecisionPlanner, EventEmitter, IndexMaintenanceService, TurnOutcome, TurnPhase, TurnRequest};
pub use config::{IndexTuning, MnemoConfig};
pub use domain::{
    CostEstimate, DecisionPlan, IndexConfiguration, Intent, Language, MajorType, MemoryError,
    MemoryEvent, MemoryEventKind, MemoryRecord, RetrievalStrategy, RetrievalWeighting,
    StorageFormat, StorageLocation, StorageStrategy, TurnWarning, TypePath, TypePrefix,
};
pub use ports::{
    ActivityHistogram, CompletionService, CorpusStatistics, EmbeddingService, MemoryRepository,
    MemorySearchFilter, SearchQuery,
};
pub use services::{
    Classification, ContentProcessor, HierarchicalClassifier, IndexOptimizer,
    OptimizationSnapshot, StorageStrategySelector, Taxonomy,
};
