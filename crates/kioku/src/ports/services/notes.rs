//! Notes Source Port
//!
//! Lists static notes. Failures are never fatal to a gather.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, NoteFile};

#[async_trait]
pub trait NotesSource: Send + Sync {
    /// All notes currently available, in any order
    async fn list_notes(&self) -> Result<Vec<NoteFile>, DomainError>;
}
