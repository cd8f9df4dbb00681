//! History Compressor
//!
//! Keeps long conversation histories inside a model's context window.
//!
//! Two independent strategies share the same recent-tail rule (the last
//! `recent_buffer` messages are always kept verbatim):
//!
//! - [`HistoryCompressor::compress`]: topic summaries per chunk, optionally
//!   collapsed into one broad summary.
//! - [`HistoryCompressor::recursive_summarize`]: multi-level tree
//!   summarization converging toward a token budget.
//!
//! LLM failures never reach the caller: each failed call is replaced by a
//! deterministic fallback text.

mod chunking;
mod memories;
mod raptor;
mod tools;

pub use chunking::smart_chunk;
pub use memories::render_memories;
pub use raptor::SummaryTree;
pub use tools::summarize_tool_interactions;

use std::sync::Arc;

use futures::future::join_all;

use crate::config::CompressionConfig;
use crate::domain::{CompressionScope, ConversationMessage, SummaryKind};
use crate::ports::{CompletionProvider, TokenEstimator};
use crate::services::tokens::HeuristicTokenEstimator;

pub struct HistoryCompressor {
    llm: Arc<dyn CompletionProvider>,
    estimator: Arc<dyn TokenEstimator>,
    config: CompressionConfig,
}

impl HistoryCompressor {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self {
            llm,
            estimator: Arc::new(HeuristicTokenEstimator),
            config: CompressionConfig::default(),
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_config(mut self, config: CompressionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Estimated tokens of a message list, as rendered in transcripts
    pub fn message_tokens(&self, messages: &[ConversationMessage]) -> usize {
        messages
            .iter()
            .map(|m| self.estimator.estimate(&m.transcript_line()))
            .sum()
    }

    /// Topic/broad compression.
    ///
    /// Histories no longer than the recent buffer are returned unchanged.
    /// Otherwise tool interactions in the older part are collapsed first, then
    /// older messages become one topic summary per chunk; those are
    /// collapsed into a single broad summary when the compressed part is over
    /// the broad threshold or `scope` is [`CompressionScope::Broad`], provided
    /// there is more than one segment.
    pub async fn compress(
        &self,
        messages: &[ConversationMessage],
        scope: CompressionScope,
    ) -> Vec<ConversationMessage> {
        let recent_buffer = self.config.recent_buffer;
        if messages.len() <= recent_buffer {
            return messages.to_vec();
        }

        let collapsed = summarize_tool_interactions(messages, recent_buffer);
        let (older, recent) = collapsed.split_at(collapsed.len() - recent_buffer);
        let chunks = smart_chunk(older, self.config.topic_group_size.max(1));
        let mut compressed: Vec<ConversationMessage> =
            join_all(chunks.iter().map(|chunk| self.summarize_topic(chunk))).await;

        let tokens = self.message_tokens(&compressed);
        let over_budget = tokens > self.config.broad_summary_threshold;
        if (over_budget || scope == CompressionScope::Broad) && compressed.len() > 1 {
            tracing::debug!(
                segments = compressed.len(),
                tokens,
                ?scope,
                "Collapsing topic summaries into a broad summary"
            );
            compressed = vec![self.summarize_broad(&compressed).await];
        }

        tracing::info!(
            before = messages.len(),
            after = compressed.len() + recent.len(),
            "📝 History compressed"
        );

        compressed.extend_from_slice(recent);
        compressed
    }

    /// Summary message for one topic chunk
    async fn summarize_topic(&self, chunk: &[ConversationMessage]) -> ConversationMessage {
        if let [only] = chunk {
            if only.is_summary() {
                return only.clone();
            }
        }

        let explicit = chunk
            .iter()
            .filter_map(ConversationMessage::topic_change)
            .find_map(|call| call.summary_argument());
        if let Some(text) = explicit {
            return ConversationMessage::summary(SummaryKind::Topic, text);
        }

        let transcript: Vec<String> = chunk.iter().map(|m| m.transcript_line()).collect();
        let prompt = format!(
            r#"Summarize the following conversation segment in at most {words} words.
Keep decisions, facts, names and open tasks. Write in the same language as the conversation.

## Conversation:
{transcript}"#,
            words = self.config.topic_summary_words,
            transcript = transcript.join("\n")
        );

        let text = self
            .complete_or(&prompt, true, || {
                format!(
                    "[Earlier conversation: {} messages could not be summarized]",
                    chunk.len()
                )
            })
            .await;
        ConversationMessage::summary(SummaryKind::Topic, text)
    }

    /// One broad summary replacing all topic summaries
    async fn summarize_broad(&self, summaries: &[ConversationMessage]) -> ConversationMessage {
        let sections: Vec<String> = summaries.iter().map(|m| m.content.clone()).collect();
        let prompt = format!(
            r#"Combine the following summaries of consecutive conversation topics into one coherent narrative.
Preserve the order of events, key decisions and unresolved questions. Be concise.

## Topic Summaries:
{}"#,
            sections.join("\n\n")
        );

        let text = self
            .complete_or(&prompt, false, || sections.join("\n"))
            .await;
        ConversationMessage::summary(SummaryKind::Broad, text)
    }

    /// Completion text, or `fallback()` when the call fails or returns nothing
    async fn complete_or(
        &self,
        prompt: &str,
        use_fast_model: bool,
        fallback: impl FnOnce() -> String,
    ) -> String {
        match self.llm.complete(prompt, use_fast_model).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Summarization returned empty text, using fallback");
                fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Summarization failed, using fallback");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageRole, ToolCall, MARK_TOPIC_CHANGE};
    use crate::testing::{FakeCompletion, WordTokenEstimator};

    fn dialogue(n: usize) -> Vec<ConversationMessage> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationMessage::user(format!("question {}", i))
                } else {
                    ConversationMessage::assistant(format!("answer {}", i))
                }
            })
            .collect()
    }

    fn compressor(llm: Arc<FakeCompletion>) -> HistoryCompressor {
        HistoryCompressor::new(llm).with_estimator(Arc::new(WordTokenEstimator))
    }

    /// 12 older messages split by a marker at index 3, then 10 recent
    fn marked_history(summary: Option<&str>) -> Vec<ConversationMessage> {
        let mut messages = dialogue(22);
        let args = match summary {
            Some(text) => serde_json::json!({ "summary": text }),
            None => serde_json::json!({}),
        };
        messages[3] = ConversationMessage::assistant("moving on")
            .with_tool_calls(vec![ToolCall::new(MARK_TOPIC_CHANGE, args)]);
        messages
    }

    #[tokio::test]
    async fn test_short_history_unchanged() {
        let llm = Arc::new(FakeCompletion::numbered());
        let messages = dialogue(10);

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Broad)
            .await;

        assert_eq!(out, messages);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_fifteen_messages_become_eleven() {
        let llm = Arc::new(FakeCompletion::numbered());
        let messages = dialogue(15);

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out.len(), 11);
        assert_eq!(out[0].role, MessageRole::Summary);
        assert_eq!(out[0].summary_kind, Some(SummaryKind::Topic));
        assert_eq!(out[0].content, "summary 1");
        assert_eq!(&out[1..], &messages[5..]);
        assert_eq!(llm.calls(), 1);
        assert!(llm.prompts()[0].0.contains("user: question 0"));
    }

    #[tokio::test]
    async fn test_tool_interactions_collapsed_before_summarizing() {
        let llm = Arc::new(FakeCompletion::numbered());
        let call = ToolCall::new("read_file", serde_json::json!({ "path": "Cargo.toml" }));
        let mut messages = vec![
            ConversationMessage::assistant("checking").with_tool_calls(vec![call.clone()]),
            ConversationMessage::tool(call.id, "[workspace]"),
        ];
        messages.extend(dialogue(10));

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out.len(), 11);
        assert_eq!(
            out[0].content,
            "[Tool Interaction: read_file executed. Results hidden.]"
        );
        assert_eq!(&out[1..], &messages[2..]);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_collapsed_interaction_summarized_with_its_topic() {
        let llm = Arc::new(FakeCompletion::numbered());
        let call = ToolCall::new("search", serde_json::json!({}));
        let mut messages = dialogue(3);
        messages.push(ConversationMessage::assistant("searching").with_tool_calls(vec![call.clone()]));
        messages.push(ConversationMessage::tool(call.id.clone(), "hit one"));
        messages.push(ConversationMessage::tool(call.id, "hit two"));
        messages.extend(dialogue(10));

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out.len(), 11);
        assert_eq!(llm.calls(), 1);
        let prompt = &llm.prompts()[0].0;
        assert!(prompt.contains("[Tool Interaction: search executed. Results hidden.]"));
        assert!(!prompt.contains("hit one"));
    }

    #[tokio::test]
    async fn test_single_summary_chunk_passes_through() {
        let llm = Arc::new(FakeCompletion::numbered());
        let mut messages = vec![ConversationMessage::summary(
            SummaryKind::Broad,
            "Everything so far",
        )];
        messages.extend(dialogue(10));

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out, messages);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_topic_marker_summary_used_verbatim() {
        let llm = Arc::new(FakeCompletion::numbered());
        let messages = marked_history(Some("Planned the release"));

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out.len(), 12);
        assert_eq!(out[0].content, "Planned the release");
        assert_eq!(out[1].content, "summary 1");
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_broad_scope_forces_collapse() {
        let llm = Arc::new(FakeCompletion::numbered());
        let messages = marked_history(None);

        let out = compressor(llm.clone())
            .compress(&messages, CompressionScope::Broad)
            .await;

        assert_eq!(out.len(), 11);
        assert_eq!(out[0].summary_kind, Some(SummaryKind::Broad));
        assert_eq!(out[0].content, "summary 3");
        assert_eq!(llm.calls(), 3);
        // Broad pass runs on the regular model
        let prompts = llm.prompts();
        assert!(prompts.iter().filter(|(_, fast)| !fast).count() == 1);
    }

    #[tokio::test]
    async fn test_token_threshold_forces_collapse() {
        let llm = Arc::new(FakeCompletion::numbered());
        let config = CompressionConfig {
            broad_summary_threshold: 3,
            ..CompressionConfig::default()
        };
        let messages = marked_history(None);

        let out = compressor(llm.clone())
            .with_config(config)
            .compress(&messages, CompressionScope::Topic)
            .await;

        assert_eq!(out.len(), 11);
        assert_eq!(out[0].summary_kind, Some(SummaryKind::Broad));
    }

    #[tokio::test]
    async fn test_single_segment_never_broadened() {
        let llm = Arc::new(FakeCompletion::numbered());
        let out = compressor(llm.clone())
            .compress(&dialogue(15), CompressionScope::Broad)
            .await;

        assert_eq!(out[0].summary_kind, Some(SummaryKind::Topic));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let llm = Arc::new(FakeCompletion::failing());
        let messages = marked_history(None);

        let topic = compressor(llm.clone())
            .compress(&messages, CompressionScope::Topic)
            .await;
        assert_eq!(topic.len(), 12);
        assert_eq!(
            topic[0].content,
            "[Earlier conversation: 4 messages could not be summarized]"
        );

        let broad = compressor(llm)
            .compress(&messages, CompressionScope::Broad)
            .await;
        assert_eq!(broad.len(), 11);
        assert_eq!(
            broad[0].content,
            "[Earlier conversation: 4 messages could not be summarized]\n[Earlier conversation: 8 messages could not be summarized]"
        );
    }

    #[tokio::test]
    async fn test_input_not_mutated() {
        let llm = Arc::new(FakeCompletion::numbered());
        let messages = dialogue(30);
        let snapshot = messages.clone();
        let _ = compressor(llm).compress(&messages, CompressionScope::Broad).await;
        assert_eq!(messages, snapshot);
    }
}
