//! Memory-list summarization for prompt budgets

use futures::future::join_all;

use super::HistoryCompressor;
use crate::domain::MemoryItem;

/// One line per memory: `- title: content`
pub fn render_memories(memories: &[MemoryItem]) -> String {
    memories
        .iter()
        .map(|m| format!("- {}: {}", m.title, m.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl HistoryCompressor {
    /// Render `memories` within `target_tokens`.
    ///
    /// Returned verbatim when it fits. Otherwise each chunk of
    /// `memory_chunk_size` memories is summarized (raw text on failure), and
    /// the concatenation gets one final pass if still over budget.
    pub async fn summarize_memories(&self, memories: &[MemoryItem], target_tokens: usize) -> String {
        let rendered = render_memories(memories);
        if self.estimator.estimate(&rendered) <= target_tokens {
            return rendered;
        }

        let chunks: Vec<&[MemoryItem]> = memories.chunks(self.config.memory_chunk_size.max(1)).collect();
        let summaries = join_all(chunks.iter().map(|chunk| self.summarize_memory_chunk(chunk))).await;
        let combined = summaries.join("\n\n");

        let tokens = self.estimator.estimate(&combined);
        if tokens <= target_tokens {
            return combined;
        }

        tracing::debug!(tokens, target_tokens, "Memory summaries over budget, condensing");
        let prompt = format!(
            r#"Condense the following knowledge notes to roughly {target} tokens.
Keep concrete facts, names and numbers; drop repetition.

## Notes:
{combined}"#,
            target = target_tokens,
            combined = combined
        );
        self.complete_or(&prompt, false, || combined.clone()).await
    }

    async fn summarize_memory_chunk(&self, chunk: &[MemoryItem]) -> String {
        let raw = render_memories(chunk);
        let prompt = format!(
            r#"Summarize the following stored memories into a short list of key facts.
Keep concrete facts, names and numbers.

## Memories:
{}"#,
            raw
        );
        self.complete_or(&prompt, true, || raw.clone()).await
    }
}
