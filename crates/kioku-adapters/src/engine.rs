//! Engine wiring
//!
//! Builds the retriever and compressor from `AdapterSettings`, picking
//! Qdrant when configured and the in-memory store otherwise.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use kioku::{
    CancellationToken, CompletionProvider, ContextRetriever, ConversationMessage, EngineConfig,
    GatherRequest, GatherStream, HistoryCompressor, LlmTagGenerator, MemorySearchProvider,
    TagGenerator,
};

use crate::config::{load_engine_config, AdapterSettings};
use crate::embedding::OpenAiEmbeddingService;
use crate::gemini::GeminiCompletionProvider;
use crate::memory_store::InMemoryMemoryStore;
use crate::notes::DirectoryNotesSource;
use crate::qdrant::QdrantMemoryStore;

const DEFAULT_CONFIG_FILE: &str = "kioku.toml";

/// Fully wired context engine
#[derive(Clone)]
pub struct Engine {
    pub retriever: ContextRetriever,
    pub compressor: Arc<HistoryCompressor>,
    pub tag_generator: Arc<dyn TagGenerator>,
}

impl Engine {
    /// Read settings and engine config from the environment, then connect
    pub fn from_env() -> Result<Self> {
        let settings = AdapterSettings::from_env();
        let config_path = settings
            .config_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
        let config = load_engine_config(Path::new(&config_path))?;
        Self::connect(&settings, &config)
    }

    pub fn connect(settings: &AdapterSettings, config: &EngineConfig) -> Result<Self> {
        config.validate().context("Invalid engine config")?;

        let Some(openai_key) = settings.openai_api_key.clone() else {
            bail!("OPENAI_API_KEY is required for embeddings");
        };
        let Some(gemini_key) = settings.gemini_api_key.clone() else {
            bail!("GEMINI_API_KEY is required for summaries and tags");
        };

        let mut embedding = OpenAiEmbeddingService::new(openai_key);
        if let Some(model) = &settings.openai_embedding_model {
            embedding = embedding.with_model(model.clone());
        }

        let mut gemini = GeminiCompletionProvider::new(gemini_key);
        if settings.gemini_model.is_some() || settings.gemini_fast_model.is_some() {
            let model = settings
                .gemini_model
                .clone()
                .unwrap_or_else(|| gemini.model_id(false).to_string());
            let fast_model = settings
                .gemini_fast_model
                .clone()
                .unwrap_or_else(|| gemini.model_id(true).to_string());
            gemini = gemini.with_models(model, fast_model);
        }
        let llm: Arc<dyn CompletionProvider> = Arc::new(gemini);

        let search: Arc<dyn MemorySearchProvider> = match &settings.qdrant_url {
            Some(url) => Arc::new(
                QdrantMemoryStore::connect(
                    url,
                    settings.qdrant_api_key.clone(),
                    settings.qdrant_collection.clone(),
                )
                .context("Failed to connect to Qdrant")?,
            ),
            None => {
                tracing::warn!("⚠️  No QDRANT_URL set - using in-memory memory store");
                Arc::new(InMemoryMemoryStore::new())
            }
        };

        let mut retriever =
            ContextRetriever::new(Arc::new(embedding), search).with_engine_config(config);
        match &settings.notes_dir {
            Some(dir) => retriever = retriever.with_notes(Arc::new(DirectoryNotesSource::new(dir))),
            None => tracing::info!("No KIOKU_NOTES_DIR set - notes disabled"),
        }

        let compressor = HistoryCompressor::new(llm.clone()).with_config(config.compression.clone());

        tracing::info!(
            llm = llm.provider_name(),
            model = llm.model_id(false),
            fast_model = llm.model_id(true),
            "🧠 Kioku engine ready"
        );

        Ok(Self {
            retriever,
            compressor: Arc::new(compressor),
            tag_generator: Arc::new(LlmTagGenerator::new(llm)),
        })
    }

    /// Start a gather with the engine's tag generator attached
    pub fn gather(
        &self,
        query: impl Into<String>,
        history: Vec<ConversationMessage>,
        cancel: CancellationToken,
    ) -> GatherStream {
        let request = GatherRequest::new(query)
            .with_history(history)
            .with_tag_generator(self.tag_generator.clone());
        self.retriever.gather(request, cancel)
    }
}
