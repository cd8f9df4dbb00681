//! Context Ranker
//!
//! Merges semantic search results with tag matches into one ordering:
//! tag matches get a fixed boost, and every score decays exponentially with
//! the memory's age (42-day half-life by default).

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::RankingConfig;
use crate::domain::{MemoryItem, ScoredMemory};
use crate::services::vector::{cosine_similarity_with_magnitudes, magnitude};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone)]
pub struct ContextRanker {
    config: RankingConfig,
}

impl Default for ContextRanker {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl ContextRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Rank against the current time
    pub fn rank_memories(
        &self,
        semantic: &[ScoredMemory],
        tag_based: &[MemoryItem],
        query_embedding: &[f32],
    ) -> Vec<ScoredMemory> {
        self.rank_memories_at(semantic, tag_based, query_embedding, Utc::now())
    }

    /// Rank with `now` as the reference point for decay
    pub fn rank_memories_at(
        &self,
        semantic: &[ScoredMemory],
        tag_based: &[MemoryItem],
        query_embedding: &[f32],
        now: DateTime<Utc>,
    ) -> Vec<ScoredMemory> {
        let tag_ids: HashSet<&str> = tag_based.iter().map(|m| m.id.as_str()).collect();

        let mut ranked: Vec<ScoredMemory> = semantic
            .iter()
            .map(|scored| {
                let mut scored = scored.clone();
                if tag_ids.contains(scored.memory.id.as_str()) {
                    scored.score = Some(scored.effective_score() + self.config.tag_boost);
                }
                scored
            })
            .collect();

        let query_magnitude = magnitude(query_embedding);
        let mut seen: HashSet<String> = ranked.iter().map(|s| s.memory.id.clone()).collect();
        for memory in tag_based {
            if !seen.insert(memory.id.clone()) {
                continue;
            }
            let similarity = cosine_similarity_with_magnitudes(
                query_embedding,
                &memory.embedding,
                query_magnitude,
                magnitude(&memory.embedding),
            );
            ranked.push(ScoredMemory::new(
                memory.clone(),
                Some(similarity + self.config.tag_boost),
            ));
        }

        for scored in &mut ranked {
            let decay = self.decay_factor(&scored.memory, now);
            scored.score = Some(scored.effective_score() * decay);
        }

        sort_by_score(&mut ranked);
        ranked
    }

    /// `2^(-age_days / half_life_days)`; future timestamps count as age 0
    pub fn decay_factor(&self, memory: &MemoryItem, now: DateTime<Utc>) -> f64 {
        let age_seconds = (now - memory.updated_at).num_milliseconds() as f64 / 1000.0;
        let age_days = (age_seconds / SECONDS_PER_DAY).max(0.0);
        (-age_days / self.config.half_life_days).exp2()
    }
}

/// Stable sort, highest effective score first
pub fn sort_by_score(memories: &mut [ScoredMemory]) {
    memories.sort_by(|a, b| b.effective_score().total_cmp(&a.effective_score()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn memory(id: &str, embedding: Vec<f32>, age_days: i64, now: DateTime<Utc>) -> MemoryItem {
        let mut memory = MemoryItem::new(id, format!("content of {}", id), vec![])
            .with_embedding(embedding)
            .with_updated_at(now - Duration::days(age_days));
        memory.id = id.to_string();
        memory
    }

    fn score_of(ranked: &[ScoredMemory], id: &str) -> f64 {
        ranked
            .iter()
            .find(|s| s.memory.id == id)
            .map(ScoredMemory::effective_score)
            .unwrap()
    }

    #[test]
    fn test_decay_halves_every_half_life() {
        let now = Utc::now();
        let ranker = ContextRanker::default();
        for (age, expected) in [(0, 1.0), (42, 0.5), (84, 0.25)] {
            let semantic = vec![ScoredMemory::new(memory("m", vec![1.0], age, now), Some(1.0))];
            let ranked = ranker.rank_memories_at(&semantic, &[], &[1.0], now);
            let score = score_of(&ranked, "m");
            assert!(
                (score - expected).abs() <= expected * 0.01,
                "age {} gave {}",
                age,
                score
            );
        }
    }

    #[test]
    fn test_tag_match_adds_exact_boost() {
        let now = Utc::now();
        let ranker = ContextRanker::default();
        let m = memory("m", vec![1.0, 0.0], 0, now);
        let semantic = vec![ScoredMemory::new(m.clone(), Some(0.6))];

        let plain = score_of(&ranker.rank_memories_at(&semantic, &[], &[1.0, 0.0], now), "m");
        let boosted = score_of(
            &ranker.rank_memories_at(&semantic, &[m], &[1.0, 0.0], now),
            "m",
        );
        assert!((boosted - plain - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unscored_semantic_hit_boosted_from_zero() {
        let now = Utc::now();
        let m = memory("m", vec![1.0], 0, now);
        let semantic = vec![ScoredMemory::unscored(m.clone())];
        let ranked = ContextRanker::default().rank_memories_at(&semantic, &[m], &[1.0], now);
        assert!((score_of(&ranked, "m") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tag_only_memory_scored_by_similarity() {
        let now = Utc::now();
        let tag_only = memory("t", vec![0.0, 1.0], 0, now);
        let ranked =
            ContextRanker::default().rank_memories_at(&[], &[tag_only], &[0.0, 2.0], now);
        assert_eq!(ranked.len(), 1);
        assert!((score_of(&ranked, "t") - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_tag_hits_inserted_once() {
        let now = Utc::now();
        let t = memory("t", vec![1.0], 0, now);
        let ranked = ContextRanker::default().rank_memories_at(
            &[],
            &[t.clone(), t],
            &[1.0],
            now,
        );
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_recent_weaker_match_beats_stale_stronger_one() {
        let now = Utc::now();
        let a = memory("a", vec![1.0], 42, now);
        let b = memory("b", vec![1.0], 0, now);
        let semantic = vec![
            ScoredMemory::new(a, Some(0.8)),
            ScoredMemory::new(b, Some(0.5)),
        ];
        let ranked = ContextRanker::default().rank_memories_at(&semantic, &[], &[1.0], now);
        let order: Vec<&str> = ranked.iter().map(|s| s.memory.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert!((score_of(&ranked, "a") - 0.4).abs() < 0.005);
    }

    #[test]
    fn test_output_sorted_with_ties_and_missing_scores() {
        let now = Utc::now();
        let semantic = vec![
            ScoredMemory::unscored(memory("none", vec![], 0, now)),
            ScoredMemory::new(memory("x", vec![], 0, now), Some(0.3)),
            ScoredMemory::new(memory("y", vec![], 0, now), Some(0.3)),
            ScoredMemory::new(memory("z", vec![], 10, now), Some(0.9)),
            ScoredMemory::new(memory("neg", vec![], 0, now), Some(-0.2)),
        ];
        let tagged = vec![memory("tagged", vec![1.0], 200, now)];
        let ranked = ContextRanker::default().rank_memories_at(&semantic, &tagged, &[1.0], now);

        assert_eq!(ranked.len(), 6);
        for pair in ranked.windows(2) {
            assert!(pair[0].effective_score() >= pair[1].effective_score());
        }
        assert!(ranked.iter().all(|s| s.score.is_some()));
    }

    #[test]
    fn test_future_timestamp_not_amplified() {
        let now = Utc::now();
        let m = memory("m", vec![1.0], -5, now);
        assert_eq!(ContextRanker::default().decay_factor(&m, now), 1.0);
    }
}
