//! Context Retriever
//!
//! End-to-end gather pipeline for one query:
//!
//! 1. Augment the query with recent dialogue (tagging context)
//! 2. Load notes, concurrently with the memory pipeline
//! 3. Generate tags (optional, failures absorbed)
//! 4. Embed the raw query (critical), then check for cancellation
//! 5. Semantic search and tag lookup, concurrently (critical)
//! 6. Rank both result sets and keep the top `limit`
//! 7. Emit the [`GatherResult`]
//!
//! Progress is reported on an ordered channel. `Ranking` and `Complete`
//! are only sent once both branches have joined.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::{EngineConfig, RankingConfig, RetrievalConfig};
use crate::domain::{
    ConversationMessage, DomainError, GatherEvent, GatherPhase, GatherResult, MemoryItem,
    NoteFile, ScoredMemory,
};
use crate::ports::{EmbeddingService, MemorySearchProvider, NotesSource, TagGenerator};
use crate::services::ranker::ContextRanker;

const EVENT_BUFFER: usize = 16;

/// Stream of progress events ending in `Complete` or an error
pub type GatherStream = ReceiverStream<Result<GatherEvent, DomainError>>;

/// Parameters of one gather call
#[derive(Clone, Default)]
pub struct GatherRequest {
    pub query: String,
    pub history: Vec<ConversationMessage>,
    /// Maximum ranked memories returned; `None` uses the configured default
    pub limit: Option<usize>,
    pub tag_generator: Option<Arc<dyn TagGenerator>>,
}

impl GatherRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_tag_generator(mut self, tag_generator: Arc<dyn TagGenerator>) -> Self {
        self.tag_generator = Some(tag_generator);
        self
    }
}

/// Output of the memory branch before ranking
struct Retrieved {
    tags: Vec<String>,
    embedding: Vec<f32>,
    semantic: Vec<ScoredMemory>,
    tag_based: Vec<MemoryItem>,
}

/// Gathers notes and ranked memories for a query.
///
/// Stateless across calls; cheap to clone.
#[derive(Clone)]
pub struct ContextRetriever {
    embedding: Arc<dyn EmbeddingService>,
    search: Arc<dyn MemorySearchProvider>,
    notes: Option<Arc<dyn NotesSource>>,
    ranker: ContextRanker,
    config: RetrievalConfig,
}

impl ContextRetriever {
    pub fn new(embedding: Arc<dyn EmbeddingService>, search: Arc<dyn MemorySearchProvider>) -> Self {
        Self {
            embedding,
            search,
            notes: None,
            ranker: ContextRanker::default(),
            config: RetrievalConfig::default(),
        }
    }

    pub fn with_notes(mut self, notes: Arc<dyn NotesSource>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_config(mut self, retrieval: RetrievalConfig, ranking: RankingConfig) -> Self {
        self.config = retrieval;
        self.ranker = ContextRanker::new(ranking);
        self
    }

    pub fn with_engine_config(self, config: &EngineConfig) -> Self {
        self.with_config(config.retrieval.clone(), config.ranking.clone())
    }

    /// Start a gather on a background task and stream its progress.
    ///
    /// Must be called within a Tokio runtime. Dropping the stream or
    /// cancelling `cancel` stops the pipeline at its next checkpoint.
    pub fn gather(&self, request: GatherRequest, cancel: CancellationToken) -> GatherStream {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let this = self.clone();

        tokio::spawn(async move {
            let outcome = this
                .run(request, &cancel, &tx)
                .await
                .map(|result| GatherEvent::Complete(Box::new(result)));
            if let Err(e) = &outcome {
                tracing::warn!(error = %e, "Gather failed");
            }
            // Consumer may have gone away
            let _ = tx.send(outcome).await;
        });

        ReceiverStream::new(rx)
    }

    /// Drive a gather to completion, ignoring progress events
    pub async fn gather_to_end(
        &self,
        request: GatherRequest,
        cancel: CancellationToken,
    ) -> Result<GatherResult, DomainError> {
        let mut stream = self.gather(request, cancel);
        while let Some(item) = stream.next().await {
            if let GatherEvent::Complete(result) = item? {
                return Ok(*result);
            }
        }
        Err(DomainError::ExternalService(
            "gather ended without a result".into(),
        ))
    }

    async fn run(
        &self,
        request: GatherRequest,
        cancel: &CancellationToken,
        tx: &mpsc::Sender<Result<GatherEvent, DomainError>>,
    ) -> Result<GatherResult, DomainError> {
        let started = Instant::now();

        emit(tx, GatherPhase::Augmenting).await;
        let augmented = augment_query(&request.query, &request.history, self.config.history_window);

        if request.query.trim().is_empty() {
            let notes = self.load_notes().await;
            tracing::debug!("Blank query, returning notes only");
            return Ok(GatherResult::empty(notes, augmented, started.elapsed()));
        }

        let limit = request.limit.unwrap_or(self.config.default_limit);
        let (notes, retrieved) = tokio::join!(
            self.load_notes(),
            self.retrieve(&request, &augmented, limit, cancel, tx)
        );

        let Some(retrieved) = retrieved? else {
            tracing::info!(notes = notes.len(), "Gather cancelled after embedding");
            return Ok(GatherResult::empty(notes, augmented, started.elapsed()));
        };

        emit(tx, GatherPhase::Ranking).await;
        let mut ranked = self.ranker.rank_memories(
            &retrieved.semantic,
            &retrieved.tag_based,
            &retrieved.embedding,
        );
        ranked.truncate(limit);

        let elapsed = started.elapsed();
        tracing::info!(
            notes = notes.len(),
            memories = ranked.len(),
            tags = retrieved.tags.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "🔍 Context gathered"
        );

        Ok(GatherResult {
            notes,
            memories: ranked,
            tags: retrieved.tags,
            query_embedding: retrieved.embedding,
            augmented_query: augmented,
            semantic_results: retrieved.semantic,
            tag_results: retrieved.tag_based,
            elapsed,
        })
    }

    /// Memory branch; `Ok(None)` when cancelled after embedding
    async fn retrieve(
        &self,
        request: &GatherRequest,
        augmented: &str,
        limit: usize,
        cancel: &CancellationToken,
        tx: &mpsc::Sender<Result<GatherEvent, DomainError>>,
    ) -> Result<Option<Retrieved>, DomainError> {
        emit(tx, GatherPhase::Tagging).await;
        let tags = match &request.tag_generator {
            Some(generator) => match generator.generate_tags(augmented).await {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!(error = %e, "Tag generation failed, continuing without tags");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        emit(tx, GatherPhase::Embedding).await;
        let embedding = self
            .embedding
            .embed(&request.query)
            .await
            .map_err(DomainError::into_embedding_failure)?;

        if cancel.is_cancelled() || tx.is_closed() {
            return Ok(None);
        }

        emit(tx, GatherPhase::Searching).await;
        let candidates = limit.saturating_mul(self.config.overfetch_factor);
        let (semantic, tag_based) = tokio::join!(
            self.search
                .search_by_similarity(&embedding, candidates, self.config.min_similarity),
            self.search_tags(&tags)
        );
        let semantic: Vec<ScoredMemory> = semantic
            .map_err(DomainError::into_persistence_failure)?
            .into_iter()
            .map(|(memory, similarity)| ScoredMemory::new(memory, Some(f64::from(similarity))))
            .collect();
        let tag_based = tag_based.map_err(DomainError::into_persistence_failure)?;

        tracing::debug!(
            semantic = semantic.len(),
            tag_based = tag_based.len(),
            "Search complete"
        );

        Ok(Some(Retrieved {
            tags,
            embedding,
            semantic,
            tag_based,
        }))
    }

    async fn search_tags(&self, tags: &[String]) -> Result<Vec<MemoryItem>, DomainError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        self.search.search_by_any_tag(tags).await
    }

    /// Notes sorted by name; any failure yields no notes
    async fn load_notes(&self) -> Vec<NoteFile> {
        let Some(source) = &self.notes else {
            return Vec::new();
        };
        match source.list_notes().await {
            Ok(mut notes) => {
                notes.sort_by(|a, b| a.name.cmp(&b.name));
                notes
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load notes, continuing without them");
                Vec::new()
            }
        }
    }
}

async fn emit(tx: &mpsc::Sender<Result<GatherEvent, DomainError>>, phase: GatherPhase) {
    tracing::trace!(%phase, "Gather progress");
    let _ = tx.send(Ok(GatherEvent::Progress(phase))).await;
}

/// Last `window` user/assistant messages followed by the query
pub fn augment_query(query: &str, history: &[ConversationMessage], window: usize) -> String {
    let dialogue: Vec<&ConversationMessage> =
        history.iter().filter(|m| m.role.is_dialogue()).collect();
    let recent = &dialogue[dialogue.len().saturating_sub(window)..];
    if recent.is_empty() {
        return query.to_string();
    }

    let mut context: Vec<String> = recent
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect();
    context.push(query.to_string());
    context.join("\n")
}
