//! Kioku Adapters
//!
//! Infrastructure implementations of the `kioku` ports:
//!
//! - `embedding`: OpenAI embeddings over HTTP
//! - `gemini`: Gemini completions (regular and fast model)
//! - `qdrant`: similarity and tag search in a Qdrant collection
//! - `memory_store`: in-process store for development and tests
//! - `notes`: notes read from a directory
//! - `config`: settings from the environment and engine TOML files
//! - `telemetry`: tracing subscriber setup
//! - `engine`: wiring of all of the above

pub mod config;
pub mod embedding;
pub mod engine;
pub mod gemini;
pub mod memory_store;
pub mod notes;
pub mod qdrant;
pub mod telemetry;

// Re-exports
pub use config::{load_engine_config, AdapterSettings};
pub use embedding::OpenAiEmbeddingService;
pub use engine::Engine;
pub use gemini::GeminiCompletionProvider;
pub use memory_store::InMemoryMemoryStore;
pub use notes::DirectoryNotesSource;
pub use qdrant::QdrantMemoryStore;
pub use telemetry::init_tracing;
