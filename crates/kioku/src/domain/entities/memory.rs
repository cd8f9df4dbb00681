//! Memory - Persisted knowledge consulted during retrieval
//!
//! Owned by the persistence layer; this crate only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MemoryItem - A piece of stored knowledge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryItem {
    /// Unique identifier for the memory
    pub id: String,
    /// Short human readable title
    pub title: String,
    /// The content/text of the memory
    pub content: String,
    /// Tags for categorization and keyword lookup
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Embedding vector of the content
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// When this memory was created
    pub created_at: DateTime<Utc>,
    /// When this memory was last updated (drives time decay)
    pub updated_at: DateTime<Utc>,
}

impl MemoryItem {
    /// Create a new memory with generated ID and timestamps
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            tags,
            metadata: serde_json::Value::Null,
            embedding: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether any of the given tags is attached to this memory (case-insensitive)
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags
            .iter()
            .any(|own| tags.iter().any(|t| t.eq_ignore_ascii_case(own)))
    }
}

/// A memory paired with its relevance score.
///
/// `score == None` means "not yet scored" and orders as 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredMemory {
    pub memory: MemoryItem,
    #[serde(default)]
    pub score: Option<f64>,
}

impl ScoredMemory {
    pub fn new(memory: MemoryItem, score: Option<f64>) -> Self {
        Self { memory, score }
    }

    pub fn unscored(memory: MemoryItem) -> Self {
        Self {
            memory,
            score: None,
        }
    }

    /// Score used for ordering; absent counts as 0
    pub fn effective_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}
