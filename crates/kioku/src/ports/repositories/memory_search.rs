//! Memory Search Port
//!
//! Read-only access to persisted memories. The engine never writes memories.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, MemoryItem};

/// Search interface over persisted memories
#[async_trait]
pub trait MemorySearchProvider: Send + Sync {
    /// Memories most similar to `query_vector`, best first, with their similarity.
    ///
    /// Results below `min_similarity` are omitted.
    async fn search_by_similarity(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<(MemoryItem, f32)>, DomainError>;

    /// Memories carrying at least one of `tags`
    async fn search_by_any_tag(&self, tags: &[String]) -> Result<Vec<MemoryItem>, DomainError>;
}
