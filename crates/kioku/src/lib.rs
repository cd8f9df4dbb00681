//! Kioku Context Engine
//!
//! Retrieval and compression of context for conversational agents.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure entities and value types
//!   - `entities/`: MemoryItem, ConversationMessage, SummaryTreeNode, GatherResult
//!   - `value_objects/`: MessageRole, SummaryKind, CompressionScope, GatherPhase
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Memory search
//!   - `services/`: Embeddings, LLM completion, tags, notes, token estimation
//!
//! - **Services** (`services/`): The engine itself
//!   - `retriever`: gather pipeline with progress events and cancellation
//!   - `ranker`: tag boost + time decay ranking
//!   - `compressor`: topic, broad and recursive history compression
//!
//! # Usage
//!
//! ```rust,ignore
//! use kioku::{ContextRetriever, GatherRequest, HistoryCompressor};
//!
//! let retriever = ContextRetriever::new(embedding, search).with_notes(notes);
//! let result = retriever
//!     .gather_to_end(GatherRequest::new("when do we deploy?"), CancellationToken::new())
//!     .await?;
//!
//! let compressor = HistoryCompressor::new(llm);
//! let history = compressor.recursive_summarize(&history, 8_000).await;
//! ```

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{CompressionConfig, EngineConfig, RankingConfig, RetrievalConfig};
pub use domain::{
    CompressionScope, ContextFormat, ConversationMessage, DomainError, GatherEvent, GatherPhase,
    GatherResult, MemoryItem, MessageRole, NoteFile, ScoredMemory, SummaryKind, SummaryTreeNode,
    ToolCall, MARK_TOPIC_CHANGE,
};
pub use ports::{
    CompletionProvider, EmbeddingService, MemorySearchProvider, NotesSource, TagGenerator,
    TokenEstimator,
};
pub use services::{
    ContextRanker, ContextRetriever, GatherRequest, GatherStream, HeuristicTokenEstimator,
    HistoryCompressor, LlmTagGenerator, SummaryTree,
};
pub use tokio_util::sync::CancellationToken;
