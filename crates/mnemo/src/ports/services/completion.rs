//! Completion Service Port
//!
//! Abstract interface for the model collaborator's generation endpoint.

use async_trait::async_trait;

use crate::domain::errors::MemoryError;

/// Service interface for response generation. The prompt already
/// carries any retrieved context; providers only need to complete it.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, MemoryError>;
}
