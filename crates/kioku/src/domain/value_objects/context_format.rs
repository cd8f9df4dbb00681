//! ContextFormat - Rendering style for gathered context

use serde::{Deserialize, Serialize};

/// Output format when rendering a gather result into a prompt block
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ContextFormat {
    /// Markdown sections with bullet lists
    #[default]
    Markdown,
    /// Plain sections with scores, for debugging
    Raw,
}

impl std::str::FromStr for ContextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ContextFormat::Markdown),
            "raw" => Ok(ContextFormat::Raw),
            _ => Err(format!("Unknown format: {}. Valid: markdown, raw", s)),
        }
    }
}
