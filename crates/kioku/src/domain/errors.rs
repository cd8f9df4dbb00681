//! Domain Errors
//!
//! Error types for retrieval and compression operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Tag generation failed: {0}")]
    TagGenerationFailed(String),

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Notes unavailable: {0}")]
    NotesUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    /// Whether this error terminates a gather call.
    ///
    /// Only embedding and persistence failures are fatal; everything else is
    /// absorbed and the pipeline degrades.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            DomainError::EmbeddingFailed(_) | DomainError::PersistenceFailed(_)
        )
    }

    /// Re-tag any error as an embedding failure, keeping its message
    pub fn into_embedding_failure(self) -> Self {
        match self {
            DomainError::EmbeddingFailed(_) => self,
            other => DomainError::EmbeddingFailed(other.to_string()),
        }
    }

    /// Re-tag any error as a persistence failure, keeping its message
    pub fn into_persistence_failure(self) -> Self {
        match self {
            DomainError::PersistenceFailed(_) => self,
            other => DomainError::PersistenceFailed(other.to_string()),
        }
    }
}
