//! Gather Result & Events
//!
//! Output of one retrieval call and the items of its progress stream.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{MemoryItem, NoteFile, ScoredMemory};
use crate::domain::value_objects::{ContextFormat, GatherPhase};

/// Aggregate output of one gather call. Constructed once, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GatherResult {
    /// Notes loaded from the notes source, sorted by name
    pub notes: Vec<NoteFile>,
    /// Ranked memories, capped to the requested limit
    pub memories: Vec<ScoredMemory>,
    /// Tags generated for the augmented query
    pub tags: Vec<String>,
    /// Embedding of the raw query
    pub query_embedding: Vec<f32>,
    /// Recent dialogue joined with the query
    pub augmented_query: String,
    /// Semantic search results before ranking
    pub semantic_results: Vec<ScoredMemory>,
    /// Tag-matched memories before ranking
    pub tag_results: Vec<MemoryItem>,
    /// Wall time spent in the call
    pub elapsed: Duration,
}

impl GatherResult {
    /// Result carrying no memories, used for blank queries and cancellation
    pub fn empty(notes: Vec<NoteFile>, augmented_query: String, elapsed: Duration) -> Self {
        Self {
            notes,
            augmented_query,
            elapsed,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.memories.is_empty()
    }

    /// Render notes and memories as a prompt context block
    pub fn render(&self, format: ContextFormat) -> String {
        match format {
            ContextFormat::Markdown => self.render_markdown(),
            ContextFormat::Raw => self.render_raw(),
        }
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();

        if !self.notes.is_empty() {
            out.push_str("## Notes\n");
            for note in &self.notes {
                out.push_str(&format!("### {}\n{}\n\n", note.name, note.content.trim()));
            }
        }

        if !self.memories.is_empty() {
            out.push_str("## Relevant Memories\n");
            for scored in &self.memories {
                out.push_str(&format!(
                    "- **{}**: {}\n",
                    scored.memory.title,
                    scored.memory.content.trim()
                ));
            }
        }

        out.trim_end().to_string()
    }

    fn render_raw(&self) -> String {
        let mut out = String::new();

        if !self.notes.is_empty() {
            out.push_str("=== NOTES ===\n");
            for note in &self.notes {
                out.push_str(&format!("[{}] ({})\n{}\n", note.name, note.source, note.content));
            }
        }

        if !self.memories.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("=== MEMORIES ===\n");
            for scored in &self.memories {
                out.push_str(&format!(
                    "[{}] (score: {:.3}) {}: {}\n",
                    scored.memory.id,
                    scored.effective_score(),
                    scored.memory.title,
                    scored.memory.content
                ));
            }
        }

        out
    }
}

/// Item of the gather progress stream
#[derive(Debug, Clone, PartialEq)]
pub enum GatherEvent {
    Progress(GatherPhase),
    Complete(Box<GatherResult>),
}

impl GatherEvent {
    pub fn phase(&self) -> GatherPhase {
        match self {
            GatherEvent::Progress(phase) => *phase,
            GatherEvent::Complete(_) => GatherPhase::Complete,
        }
    }
}
