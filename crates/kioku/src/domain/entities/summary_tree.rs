//! SummaryTreeNode - Recursive compression tree
//!
//! Built bottom-up by recursive summarization and never mutated afterwards.
//! Summary nodes own the nodes they replace, so every summary can be traced
//! back to its source messages.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ConversationMessage;
use crate::domain::value_objects::SummaryKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryTreeNode {
    /// One original message
    Leaf { message: ConversationMessage },
    /// Generated text standing in for `children`, in order
    Summary {
        text: String,
        children: Vec<SummaryTreeNode>,
    },
}

impl SummaryTreeNode {
    pub fn leaf(message: ConversationMessage) -> Self {
        SummaryTreeNode::Leaf { message }
    }

    pub fn summary(text: impl Into<String>, children: Vec<SummaryTreeNode>) -> Self {
        SummaryTreeNode::Summary {
            text: text.into(),
            children,
        }
    }

    /// Text fed to the summarizer for this node
    pub fn text(&self) -> String {
        match self {
            SummaryTreeNode::Leaf { message } => message.transcript_line(),
            SummaryTreeNode::Summary { text, .. } => format!("summary: {}", text),
        }
    }

    /// Number of original messages under this node
    pub fn leaf_count(&self) -> usize {
        match self {
            SummaryTreeNode::Leaf { .. } => 1,
            SummaryTreeNode::Summary { children, .. } => {
                children.iter().map(SummaryTreeNode::leaf_count).sum()
            }
        }
    }

    /// Levels of summarization above the leaves (a leaf is depth 0)
    pub fn depth(&self) -> usize {
        match self {
            SummaryTreeNode::Leaf { .. } => 0,
            SummaryTreeNode::Summary { children, .. } => {
                1 + children.iter().map(SummaryTreeNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Original messages under this node, in order
    pub fn source_messages(&self) -> Vec<&ConversationMessage> {
        match self {
            SummaryTreeNode::Leaf { message } => vec![message],
            SummaryTreeNode::Summary { children, .. } => children
                .iter()
                .flat_map(SummaryTreeNode::source_messages)
                .collect(),
        }
    }

    /// Flat representation: leaves yield their message, summaries a topic summary
    pub fn to_message(&self) -> ConversationMessage {
        match self {
            SummaryTreeNode::Leaf { message } => message.clone(),
            SummaryTreeNode::Summary { text, .. } => {
                ConversationMessage::summary(SummaryKind::Topic, text.clone())
            }
        }
    }
}
