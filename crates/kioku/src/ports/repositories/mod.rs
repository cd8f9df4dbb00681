//! Repository Ports
//!
//! Abstract interfaces for reading persisted memories.

mod memory_search;

pub use memory_search::*;
