//! Topic chunking of conversation history

use crate::domain::ConversationMessage;

/// Split `messages` into topic chunks, in order.
///
/// A chunk closes at a message carrying a `mark_topic_change` call, or once
/// it holds `group_size` messages. The size rule never separates a tool call
/// from the tool results answering it, so a chunk may grow past
/// `group_size` to keep an interaction whole. The topic-change rule is
/// checked first.
pub fn smart_chunk(
    messages: &[ConversationMessage],
    group_size: usize,
) -> Vec<Vec<ConversationMessage>> {
    let mut chunks = Vec::new();
    let mut current: Vec<ConversationMessage> = Vec::new();
    let mut open_calls: Vec<&str> = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        if message.has_tool_calls() {
            open_calls = message.tool_calls.iter().map(|c| c.id.as_str()).collect();
        } else if !message.is_tool_result() {
            open_calls.clear();
        }
        current.push(message.clone());

        if message.topic_change().is_some() {
            chunks.push(std::mem::take(&mut current));
            continue;
        }

        if current.len() >= group_size && !answers_open_call(&open_calls, messages.get(i + 1)) {
            chunks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Whether `next` is a tool result answering one of the open calls
fn answers_open_call(open_calls: &[&str], next: Option<&ConversationMessage>) -> bool {
    next.is_some_and(|n| {
        n.is_tool_result()
            && n
                .tool_call_id
                .as_deref()
                .is_some_and(|id| open_calls.contains(&id))
    })
}
