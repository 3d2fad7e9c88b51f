//! Embedding Service Port
//!
//! Abstract interface for the model collaborator's embedding endpoint.

use async_trait::async_trait;

use crate::domain::errors::MemoryError;

/// Service interface for generating text embeddings.
///
/// The returned vector's length is a fixed contract (`dimension`); the
/// core validates it on receipt before letting a vector near storage.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generate embedding vector for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError>;

    /// Dimensionality this service produces
    fn dimension(&self) -> usize;
}
