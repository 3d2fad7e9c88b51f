//! Domain Errors
//!
//! Error types for memory-core operations.

use thiserror::Error;

/// Errors surfaced by the memory core and its collaborators.
///
/// Classification ambiguity is deliberately absent: the classifier
/// recovers to its default leaf internally and never returns an error.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("entity extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("storage failed: {0}")]
    StorageFailure(String),

    #[error("index configuration rejected: {0}")]
    IndexApplyFailure(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    EmbeddingDimensionMismatch { expected: usize, got: usize },

    #[error("response generation failed: {0}")]
    ResponseFailed(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),
}

/// Non-fatal conditions reported on a completed turn.
///
/// A warning means a planned action degraded (empty retrieval context,
/// a write that failed after retry) while the response path completed.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum TurnWarning {
    RetrievalUnavailable(String),
    StorageFailed(String),
}
