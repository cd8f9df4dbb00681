//! NoteFile - Static text loaded from a notes directory

use serde::{Deserialize, Serialize};

/// A named static text block, refreshed on each gather call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteFile {
    /// Display name (file stem)
    pub name: String,
    /// Full text of the note
    pub content: String,
    /// Where the note came from (path or URI)
    pub source: String,
}

impl NoteFile {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            source: source.into(),
        }
    }
}
