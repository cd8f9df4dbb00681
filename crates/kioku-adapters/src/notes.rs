//! Directory-backed notes
//!
//! Every `.md` / `.txt` file directly inside the directory is one note,
//! named after its file stem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kioku::{DomainError, NoteFile, NotesSource};

const NOTE_EXTENSIONS: &[&str] = &["md", "txt"];

pub struct DirectoryNotesSource {
    dir: PathBuf,
}

impl DirectoryNotesSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_note(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| NOTE_EXTENSIONS.iter().any(|n| n.eq_ignore_ascii_case(e)))
}

#[async_trait]
impl NotesSource for DirectoryNotesSource {
    async fn list_notes(&self) -> Result<Vec<NoteFile>, DomainError> {
        let unavailable =
            |e: std::io::Error| DomainError::NotesUnavailable(format!("{}: {}", self.dir.display(), e));

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(unavailable)?;
        let mut notes = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let path = entry.path();
            if !entry.file_type().await.map_err(unavailable)?.is_file() || !is_note(&path) {
                continue;
            }

            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable note");
                    continue;
                }
            };
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            notes.push(NoteFile::new(name, content, path.display().to_string()));
        }

        tracing::debug!(count = notes.len(), dir = %self.dir.display(), "Loaded notes");
        Ok(notes)
    }
}
