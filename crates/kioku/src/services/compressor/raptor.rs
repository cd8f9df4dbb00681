//! Recursive (tree) summarization
//!
//! Older messages start as leaf nodes. Each level greedily packs adjacent
//! nodes into chunks of at most `raptor_chunk_tokens` and replaces every
//! multi-node chunk with one summary node owning the chunk. Levels repeat
//! until the nodes fit the budget left after the recent tail, the list stops
//! shrinking, or `raptor_max_levels` is reached. The level cap bounds LLM
//! usage; fitting the target is best effort.

use futures::future::join_all;

use super::{summarize_tool_interactions, HistoryCompressor};
use crate::domain::{ConversationMessage, SummaryTreeNode};

/// Result of recursive summarization before flattening
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTree {
    /// Older part of the history, possibly summarized
    pub nodes: Vec<SummaryTreeNode>,
    /// Recent tail, kept verbatim
    pub recent: Vec<ConversationMessage>,
    /// Summarization levels that ran
    pub levels: usize,
}

impl SummaryTree {
    /// Leaves become their message, summaries a topic summary message
    pub fn flatten(&self) -> Vec<ConversationMessage> {
        self.nodes
            .iter()
            .map(SummaryTreeNode::to_message)
            .chain(self.recent.iter().cloned())
            .collect()
    }
}

impl HistoryCompressor {
    /// Compress `messages` toward `target_tokens` and return the flat history
    pub async fn recursive_summarize(
        &self,
        messages: &[ConversationMessage],
        target_tokens: usize,
    ) -> Vec<ConversationMessage> {
        self.build_summary_tree(messages, target_tokens)
            .await
            .flatten()
    }

    /// Compress `messages` toward `target_tokens`, keeping the summary tree
    pub async fn build_summary_tree(
        &self,
        messages: &[ConversationMessage],
        target_tokens: usize,
    ) -> SummaryTree {
        let collapsed = summarize_tool_interactions(messages, self.config.recent_buffer);
        let split = collapsed.len().saturating_sub(self.config.recent_buffer);
        let (older, recent) = collapsed.split_at(split);

        let mut tree = SummaryTree {
            nodes: older.iter().cloned().map(SummaryTreeNode::leaf).collect(),
            recent: recent.to_vec(),
            levels: 0,
        };

        if self.message_tokens(&collapsed) <= target_tokens || tree.nodes.is_empty() {
            return tree;
        }

        let budget = target_tokens.saturating_sub(self.message_tokens(&tree.recent));
        while tree.levels < self.config.raptor_max_levels {
            let tokens = self.node_tokens(&tree.nodes);
            if tokens <= budget {
                break;
            }

            let before = tree.nodes.len();
            tree.nodes = self.summarize_level(std::mem::take(&mut tree.nodes)).await;
            tree.levels += 1;

            tracing::debug!(
                level = tree.levels,
                tokens_before = tokens,
                nodes_before = before,
                nodes_after = tree.nodes.len(),
                "Summarization level complete"
            );

            if tree.nodes.len() >= before {
                break;
            }
        }

        tracing::info!(
            levels = tree.levels,
            nodes = tree.nodes.len(),
            tokens = self.node_tokens(&tree.nodes) + self.message_tokens(&tree.recent),
            target_tokens,
            "📝 Recursive summarization finished"
        );
        tree
    }

    fn node_tokens(&self, nodes: &[SummaryTreeNode]) -> usize {
        nodes
            .iter()
            .map(|n| self.estimator.estimate(&n.text()))
            .sum()
    }

    /// One pass: pack nodes into capped chunks and summarize each multi-node chunk
    async fn summarize_level(&self, nodes: Vec<SummaryTreeNode>) -> Vec<SummaryTreeNode> {
        let cap = self.config.raptor_chunk_tokens;
        let mut chunks: Vec<Vec<SummaryTreeNode>> = Vec::new();
        let mut current: Vec<SummaryTreeNode> = Vec::new();
        let mut current_tokens = 0;

        for node in nodes {
            let tokens = self.estimator.estimate(&node.text());
            if !current.is_empty() && current_tokens + tokens > cap {
                chunks.push(std::mem::take(&mut current));
                current_tokens = 0;
            }
            current_tokens += tokens;
            current.push(node);
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        join_all(chunks.into_iter().map(|chunk| self.summarize_nodes(chunk))).await
    }

    async fn summarize_nodes(&self, mut chunk: Vec<SummaryTreeNode>) -> SummaryTreeNode {
        if chunk.len() == 1 {
            if let Some(node) = chunk.pop() {
                return node;
            }
        }

        let text: Vec<String> = chunk.iter().map(SummaryTreeNode::text).collect();
        let prompt = format!(
            r#"Summarize the following part of a conversation so it can replace the original.
Keep facts, decisions, names, file paths and open tasks. Be concise.

## Conversation:
{}"#,
            text.join("\n")
        );

        let leaves: usize = chunk.iter().map(SummaryTreeNode::leaf_count).sum();
        let summary = self
            .complete_or(&prompt, true, || {
                format!("[Summary unavailable for {} earlier messages]", leaves)
            })
            .await;
        SummaryTreeNode::summary(summary, chunk)
    }
}
