//! Domain Services
//!
//! Retrieval, ranking and compression logic built on the ports.

pub mod compressor;
pub mod ranker;
pub mod retriever;
pub mod tagging;
pub mod tokens;
pub mod vector;

// Re-exports
pub use compressor::{HistoryCompressor, SummaryTree};
pub use ranker::ContextRanker;
pub use retriever::{ContextRetriever, GatherRequest, GatherStream};
pub use tagging::LlmTagGenerator;
pub use tokens::HeuristicTokenEstimator;
