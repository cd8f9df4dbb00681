//! Engine Configuration
//!
//! Tunables for retrieval, ranking and compression. Every field has a
//! default, so a partial TOML/JSON document deserializes cleanly.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub compression: CompressionConfig,
}

impl EngineConfig {
    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<(), DomainError> {
        let r = &self.retrieval;
        if r.overfetch_factor == 0 {
            return Err(DomainError::Validation(
                "retrieval.overfetch_factor must be at least 1".into(),
            ));
        }
        if !(-1.0..=1.0).contains(&r.min_similarity) {
            return Err(DomainError::Validation(format!(
                "retrieval.min_similarity must be within [-1, 1], got {}",
                r.min_similarity
            )));
        }
        if self.ranking.half_life_days <= 0.0 {
            return Err(DomainError::Validation(format!(
                "ranking.half_life_days must be positive, got {}",
                self.ranking.half_life_days
            )));
        }

        let c = &self.compression;
        for (name, value) in [
            ("compression.recent_buffer", c.recent_buffer),
            ("compression.topic_group_size", c.topic_group_size),
            ("compression.raptor_chunk_tokens", c.raptor_chunk_tokens),
            ("compression.memory_chunk_size", c.memory_chunk_size),
        ] {
            if value == 0 {
                return Err(DomainError::Validation(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Recent user/assistant messages folded into the tagging context
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Semantic candidates fetched per requested result
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
    /// Similarity floor for semantic search
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    /// Limit used when callers do not pass one
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_history_window() -> usize {
    3
}

fn default_overfetch_factor() -> usize {
    2
}

fn default_min_similarity() -> f32 {
    0.35
}

fn default_limit() -> usize {
    10
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            overfetch_factor: default_overfetch_factor(),
            min_similarity: default_min_similarity(),
            default_limit: default_limit(),
        }
    }
}

/// Ranking settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingConfig {
    /// Score added to memories matched by tag
    #[serde(default = "default_tag_boost")]
    pub tag_boost: f64,
    /// Days until a memory's score halves
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,
}

fn default_tag_boost() -> f64 {
    0.5
}

fn default_half_life_days() -> f64 {
    42.0
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            tag_boost: default_tag_boost(),
            half_life_days: default_half_life_days(),
        }
    }
}

/// History compression settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressionConfig {
    /// Tail of the history always kept verbatim
    #[serde(default = "default_recent_buffer")]
    pub recent_buffer: usize,
    /// Messages per topic chunk before a boundary is forced
    #[serde(default = "default_topic_group_size")]
    pub topic_group_size: usize,
    /// Compressed-history size above which topics collapse into one broad summary
    #[serde(default = "default_broad_summary_threshold")]
    pub broad_summary_threshold: usize,
    /// Token cap of one recursive summarization chunk
    #[serde(default = "default_raptor_chunk_tokens")]
    pub raptor_chunk_tokens: usize,
    /// Maximum recursive summarization levels
    #[serde(default = "default_raptor_max_levels")]
    pub raptor_max_levels: usize,
    /// Memories per summarization chunk
    #[serde(default = "default_memory_chunk_size")]
    pub memory_chunk_size: usize,
    /// Target length of one topic summary, in words
    #[serde(default = "default_topic_summary_words")]
    pub topic_summary_words: usize,
}

fn default_recent_buffer() -> usize {
    10
}

fn default_topic_group_size() -> usize {
    10
}

fn default_broad_summary_threshold() -> usize {
    2000
}

fn default_raptor_chunk_tokens() -> usize {
    2000
}

fn default_raptor_max_levels() -> usize {
    5
}

fn default_memory_chunk_size() -> usize {
    10
}

fn default_topic_summary_words() -> usize {
    100
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            recent_buffer: default_recent_buffer(),
            topic_group_size: default_topic_group_size(),
            broad_summary_threshold: default_broad_summary_threshold(),
            raptor_chunk_tokens: default_raptor_chunk_tokens(),
            raptor_max_levels: default_raptor_max_levels(),
            memory_chunk_size: default_memory_chunk_size(),
            topic_summary_words: default_topic_summary_words(),
        }
    }
}
