//! Service Ports
//!
//! Abstract interfaces for external services.

mod completion;
mod embedding;
mod notes;
mod tagging;
mod tokens;

pub use completion::*;
pub use embedding::*;
pub use notes::*;
pub use tagging::*;
pub use tokens::*;
