//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the engine interacts with external
//! systems (vector stores, embedding models, LLMs, notes).
//!
//! Implementations of these traits live in the `kioku-adapters` crate.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
