//! In-memory Memory Store
//!
//! Brute-force search over a `Vec`, for local runs without Qdrant.

use async_trait::async_trait;
use kioku::services::vector::{cosine_similarity_with_magnitudes, magnitude};
use kioku::{DomainError, MemoryItem, MemorySearchProvider};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryMemoryStore {
    memories: RwLock<Vec<MemoryItem>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memories(memories: Vec<MemoryItem>) -> Self {
        Self {
            memories: RwLock::new(memories),
        }
    }

    /// Insert a memory, replacing any existing one with the same id
    pub async fn upsert(&self, memory: MemoryItem) {
        let mut memories = self.memories.write().await;
        match memories.iter_mut().find(|m| m.id == memory.id) {
            Some(existing) => *existing = memory,
            None => memories.push(memory),
        }
    }

    pub async fn len(&self) -> usize {
        self.memories.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memories.read().await.is_empty()
    }
}

#[async_trait]
impl MemorySearchProvider for InMemoryMemoryStore {
    async fn search_by_similarity(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<(MemoryItem, f32)>, DomainError> {
        let query_magnitude = magnitude(query_vector);
        let memories = self.memories.read().await;

        let mut hits: Vec<(MemoryItem, f32)> = memories
            .iter()
            .filter(|m| m.embedding.len() == query_vector.len())
            .map(|m| {
                let similarity = cosine_similarity_with_magnitudes(
                    query_vector,
                    &m.embedding,
                    query_magnitude,
                    magnitude(&m.embedding),
                ) as f32;
                (m, similarity)
            })
            .filter(|(_, similarity)| *similarity >= min_similarity)
            .map(|(m, similarity)| (m.clone(), similarity))
            .collect();

        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn search_by_any_tag(&self, tags: &[String]) -> Result<Vec<MemoryItem>, DomainError> {
        let memories = self.memories.read().await;
        Ok(memories
            .iter()
            .filter(|m| m.has_any_tag(tags))
            .cloned()
            .collect())
    }
}
