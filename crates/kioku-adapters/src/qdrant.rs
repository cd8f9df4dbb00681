//! Qdrant Memory Store
//!
//! Memories live in a single collection. Each point's payload is the full
//! serialized `MemoryItem`, so search hits decode straight back into memories.

use std::collections::HashMap;

use async_trait::async_trait;
use kioku::{DomainError, MemoryItem, MemorySearchProvider};
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;

const DEFAULT_TAG_LIMIT: u32 = 100;

pub struct QdrantMemoryStore {
    client: Qdrant,
    collection: String,
    tag_limit: u32,
}

impl QdrantMemoryStore {
    /// Connect to Qdrant; the collection is not touched until first use
    pub fn connect(
        url: &str,
        api_key: Option<String>,
        collection: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let builder = Qdrant::from_url(url);
        let builder = match api_key {
            Some(key) => builder.api_key(key),
            None => builder,
        };
        let client = builder.build().map_err(persistence)?;

        let collection = collection.into();
        tracing::info!(collection = %collection, "🌊 Connected to Qdrant memory store");

        Ok(Self {
            client,
            collection,
            tag_limit: DEFAULT_TAG_LIMIT,
        })
    }

    /// Maximum number of memories returned by one tag lookup
    pub fn with_tag_limit(mut self, tag_limit: u32) -> Self {
        self.tag_limit = tag_limit;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create the collection (cosine distance) if it does not exist yet
    pub async fn ensure_collection(&self, dimension: u64) -> Result<(), DomainError> {
        if self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(persistence)?
        {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await
            .map_err(persistence)?;

        tracing::info!(collection = %self.collection, dimension, "✨ Created memory collection");
        Ok(())
    }

    /// Store a memory under its id, using its own embedding as the vector
    pub async fn upsert(&self, memory: &MemoryItem) -> Result<(), DomainError> {
        if memory.embedding.is_empty() {
            return Err(DomainError::Validation(format!(
                "memory {} has no embedding",
                memory.id
            )));
        }

        let payload: HashMap<String, serde_json::Value> = serde_json::to_value(memory)
            .and_then(serde_json::from_value)
            .map_err(persistence)?;
        let point = PointStruct::new(memory.id.clone(), memory.embedding.clone(), payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(persistence)?;

        tracing::debug!(id = %memory.id, "💾 Memory stored");
        Ok(())
    }
}

fn persistence(e: impl std::fmt::Display) -> DomainError {
    DomainError::PersistenceFailed(e.to_string())
}

/// Decode a point payload back into a memory; malformed payloads are skipped
fn decode_payload<P: serde::Serialize>(payload: &P) -> Option<MemoryItem> {
    let json = serde_json::to_value(payload).ok()?;
    match serde_json::from_value(json) {
        Ok(memory) => Some(memory),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping point with malformed memory payload");
            None
        }
    }
}

#[async_trait]
impl MemorySearchProvider for QdrantMemoryStore {
    async fn search_by_similarity(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<(MemoryItem, f32)>, DomainError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query_vector.to_vec(), limit as u64)
                    .with_payload(true)
                    .score_threshold(min_similarity),
            )
            .await
            .map_err(persistence)?;

        let hits: Vec<(MemoryItem, f32)> = response
            .result
            .into_iter()
            .filter_map(|point| decode_payload(&point.payload).map(|m| (m, point.score)))
            .collect();

        tracing::debug!(count = hits.len(), "🔍 Similarity search");
        Ok(hits)
    }

    async fn search_by_any_tag(&self, tags: &[String]) -> Result<Vec<MemoryItem>, DomainError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .filter(Filter::must([Condition::matches("tags", tags.to_vec())]))
                    .limit(self.tag_limit)
                    .with_payload(true),
            )
            .await
            .map_err(persistence)?;

        let memories: Vec<MemoryItem> = response
            .result
            .into_iter()
            .filter_map(|point| decode_payload(&point.payload))
            .collect();

        tracing::debug!(count = memories.len(), "🏷️ Tag search");
        Ok(memories)
    }
}
