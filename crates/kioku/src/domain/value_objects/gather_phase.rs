//! GatherPhase - Progress markers of a retrieval call

use serde::{Deserialize, Serialize};

/// Phases reported while gathering context, in emission order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GatherPhase {
    Augmenting,
    Tagging,
    Embedding,
    Searching,
    Ranking,
    Complete,
}

impl std::fmt::Display for GatherPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatherPhase::Augmenting => write!(f, "augmenting"),
            GatherPhase::Tagging => write!(f, "tagging"),
            GatherPhase::Embedding => write!(f, "embedding"),
            GatherPhase::Searching => write!(f, "searching"),
            GatherPhase::Ranking => write!(f, "ranking"),
            GatherPhase::Complete => write!(f, "complete"),
        }
    }
}
