//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - MemoryItem / ScoredMemory: persisted knowledge and its relevance score
//! - NoteFile: static notes loaded per gather
//! - ConversationMessage: dialogue history entries and generated summaries
//! - SummaryTreeNode: recursive compression tree
//! - GatherResult / GatherEvent: retrieval output and progress stream items

mod gather;
mod memory;
mod message;
mod note;
mod summary_tree;

pub use gather::*;
pub use memory::*;
pub use message::*;
pub use note::*;
pub use summary_tree::*;
