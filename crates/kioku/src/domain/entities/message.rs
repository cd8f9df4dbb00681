//! Conversation Message Entity
//!
//! Entries of the caller's dialogue history. Compression reads these and
//! produces new summary messages; it never mutates existing ones.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MessageRole, SummaryKind};

/// Tool the assistant calls to mark a topic boundary in the history
pub const MARK_TOPIC_CHANGE: &str = "mark_topic_change";

/// A tool invocation requested by the assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }

    pub fn is_topic_change(&self) -> bool {
        self.name == MARK_TOPIC_CHANGE
    }

    /// Non-empty `summary` argument, if the call carries one
    pub fn summary_argument(&self) -> Option<&str> {
        self.arguments
            .get("summary")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool results: the call this message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Set when this message is itself a generated summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_kind: Option<SummaryKind>,
}

impl ConversationMessage {
    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            summary_kind: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    /// Tool result answering `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut message = Self::with_role(MessageRole::Tool, content);
        message.tool_call_id = Some(tool_call_id.into());
        message
    }

    pub fn summary(kind: SummaryKind, content: impl Into<String>) -> Self {
        let mut message = Self::with_role(MessageRole::Summary, content);
        message.summary_kind = Some(kind);
        message
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn is_tool_result(&self) -> bool {
        self.role == MessageRole::Tool
    }

    pub fn is_summary(&self) -> bool {
        self.role == MessageRole::Summary || self.summary_kind.is_some()
    }

    /// The `mark_topic_change` call carried by this message, if any
    pub fn topic_change(&self) -> Option<&ToolCall> {
        self.tool_calls.iter().find(|c| c.is_topic_change())
    }

    /// One transcript line, used when prompting for summaries
    pub fn transcript_line(&self) -> String {
        if self.tool_calls.is_empty() {
            return format!("{}: {}", self.role, self.content);
        }
        let names: Vec<&str> = self.tool_calls.iter().map(|c| c.name.as_str()).collect();
        format!(
            "{}: {} [called: {}]",
            self.role,
            self.content,
            names.join(", ")
        )
    }
}
