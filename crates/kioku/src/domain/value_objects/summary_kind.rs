//! SummaryKind - Granularity of a generated summary message

use serde::{Deserialize, Serialize};

/// Kind of summary a message represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// Compression of a single conversation segment
    #[default]
    Topic,
    /// One narrative replacing every topic summary
    Broad,
}

impl std::fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryKind::Topic => write!(f, "topic"),
            SummaryKind::Broad => write!(f, "broad"),
        }
    }
}
