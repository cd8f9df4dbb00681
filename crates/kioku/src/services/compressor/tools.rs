//! Tool-interaction collapsing
//!
//! Cheap pre-pass: an assistant tool call plus its results is replaced by a
//! one-line summary. The recent tail is never touched, and topic-change
//! markers are kept so chunking still sees them.

use crate::domain::{ConversationMessage, MessageRole, SummaryKind};

/// Collapse tool interactions outside the last `recent_buffer` messages
pub fn summarize_tool_interactions(
    messages: &[ConversationMessage],
    recent_buffer: usize,
) -> Vec<ConversationMessage> {
    let split = messages.len().saturating_sub(recent_buffer);
    let (older, recent) = messages.split_at(split);

    let mut out = Vec::with_capacity(messages.len());
    let mut i = 0;
    while i < older.len() {
        let message = &older[i];
        if message.role == MessageRole::Assistant
            && message.has_tool_calls()
            && message.topic_change().is_none()
        {
            let mut end = i + 1;
            while end < older.len() && older[end].is_tool_result() {
                end += 1;
            }
            if end - i > 1 {
                out.push(collapsed(message));
                i = end;
                continue;
            }
        }
        out.push(message.clone());
        i += 1;
    }

    out.extend_from_slice(recent);
    out
}

fn collapsed(call: &ConversationMessage) -> ConversationMessage {
    let names: Vec<&str> = call.tool_calls.iter().map(|c| c.name.as_str()).collect();
    ConversationMessage::summary(
        SummaryKind::Topic,
        format!(
            "[Tool Interaction: {} executed. Results hidden.]",
            names.join(", ")
        ),
    )
}
