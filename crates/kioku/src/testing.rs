//! Hand-written fakes of every port, shared by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DomainError, MemoryItem, NoteFile};
use crate::ports::{
    CompletionProvider, EmbeddingService, MemorySearchProvider, NotesSource, TagGenerator,
    TokenEstimator,
};
use crate::services::vector::cosine_similarity;

/// One token per whitespace-separated word
pub struct WordTokenEstimator;

impl TokenEstimator for WordTokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

enum Reply {
    Numbered,
    Fixed(String),
    Fail,
}

/// Completion provider that records prompts and replies by script
pub struct FakeCompletion {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, bool)>>,
}

impl FakeCompletion {
    /// Replies "summary 1", "summary 2", ...
    pub fn numbered() -> Self {
        Self::with_reply(Reply::Numbered)
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fixed(text.into()))
    }

    pub fn failing() -> Self {
        Self::with_reply(Reply::Fail)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, prompt: &str, use_fast_model: bool) -> Result<String, DomainError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), use_fast_model));
        match &self.reply {
            Reply::Numbered => Ok(format!("summary {}", n)),
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Fail => Err(DomainError::ExternalService("llm offline".into())),
        }
    }

    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_id(&self, use_fast_model: bool) -> &str {
        if use_fast_model {
            "fake-fast"
        } else {
            "fake"
        }
    }
}

/// Embedding service returning one fixed vector
pub struct FixedEmbedding {
    vector: Option<Vec<f32>>,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl FixedEmbedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl EmbeddingService for FixedEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.vector
            .clone()
            .ok_or_else(|| DomainError::ExternalService("embedding model down".into()))
    }
}

/// Brute-force search over a fixed memory list
pub struct FakeSearch {
    memories: Vec<MemoryItem>,
    fail: bool,
    pub similarity_limits: Mutex<Vec<(usize, f32)>>,
    pub tag_queries: Mutex<Vec<Vec<String>>>,
}

impl FakeSearch {
    pub fn new(memories: Vec<MemoryItem>) -> Self {
        Self {
            memories,
            fail: false,
            similarity_limits: Mutex::new(Vec::new()),
            tag_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl MemorySearchProvider for FakeSearch {
    async fn search_by_similarity(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<(MemoryItem, f32)>, DomainError> {
        self.similarity_limits
            .lock()
            .unwrap()
            .push((limit, min_similarity));
        if self.fail {
            return Err(DomainError::ExternalService("database locked".into()));
        }
        let mut hits: Vec<(MemoryItem, f32)> = self
            .memories
            .iter()
            .map(|m| (m.clone(), cosine_similarity(query_vector, &m.embedding) as f32))
            .filter(|(_, s)| *s >= min_similarity)
            .collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn search_by_any_tag(&self, tags: &[String]) -> Result<Vec<MemoryItem>, DomainError> {
        self.tag_queries.lock().unwrap().push(tags.to_vec());
        if self.fail {
            return Err(DomainError::ExternalService("database locked".into()));
        }
        Ok(self
            .memories
            .iter()
            .filter(|m| m.has_any_tag(tags))
            .cloned()
            .collect())
    }
}

pub struct FakeNotes {
    notes: Option<Vec<NoteFile>>,
    delay: Duration,
}

impl FakeNotes {
    pub fn new(notes: Vec<NoteFile>) -> Self {
        Self {
            notes: Some(notes),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            notes: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl NotesSource for FakeNotes {
    async fn list_notes(&self) -> Result<Vec<NoteFile>, DomainError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.notes
            .clone()
            .ok_or_else(|| DomainError::NotesUnavailable("permission denied".into()))
    }
}

pub struct FixedTags {
    tags: Option<Vec<String>>,
    pub contexts: Mutex<Vec<String>>,
}

impl FixedTags {
    pub fn new(tags: &[&str]) -> Self {
        Self {
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            tags: None,
            contexts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TagGenerator for FixedTags {
    async fn generate_tags(&self, context: &str) -> Result<Vec<String>, DomainError> {
        self.contexts.lock().unwrap().push(context.to_string());
        self.tags
            .clone()
            .ok_or_else(|| DomainError::TagGenerationFailed("no keywords".into()))
    }
}
