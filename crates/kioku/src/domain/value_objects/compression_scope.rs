//! CompressionScope - How far topic compression should go

use serde::{Deserialize, Serialize};

/// Requested compression scope for topic/broad compression
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionScope {
    /// Summarize per topic; collapse further only when over budget
    #[default]
    Topic,
    /// Always collapse topic summaries into one broad summary
    Broad,
}

impl std::str::FromStr for CompressionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "topic" => Ok(CompressionScope::Topic),
            "broad" => Ok(CompressionScope::Broad),
            _ => Err(format!("Unknown compression scope: {}. Valid: topic, broad", s)),
        }
    }
}
