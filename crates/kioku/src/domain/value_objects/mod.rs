//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod compression_scope;
mod context_format;
mod gather_phase;
mod message_role;
mod summary_kind;

pub use compression_scope::*;
pub use context_format::*;
pub use gather_phase::*;
pub use message_role::*;
pub use summary_kind::*;
