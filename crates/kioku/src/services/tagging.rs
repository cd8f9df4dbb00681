//! LLM-backed tag generation
//!
//! Asks the fast model for a short comma-separated keyword list and
//! normalizes it for tag lookup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::ports::{CompletionProvider, TagGenerator};

const MAX_TAGS: usize = 8;

pub struct LlmTagGenerator {
    llm: Arc<dyn CompletionProvider>,
    max_tags: usize,
}

impl LlmTagGenerator {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self {
            llm,
            max_tags: MAX_TAGS,
        }
    }

    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    fn prompt(&self, context: &str) -> String {
        format!(
            r#"Extract up to {max} short keywords that describe what the following conversation is about.
Answer with a single comma-separated line of lowercase keywords and nothing else.

## Conversation:
{context}"#,
            max = self.max_tags,
            context = context
        )
    }
}

#[async_trait]
impl TagGenerator for LlmTagGenerator {
    async fn generate_tags(&self, context: &str) -> Result<Vec<String>, DomainError> {
        let reply = self
            .llm
            .complete(&self.prompt(context), true)
            .await
            .map_err(|e| DomainError::TagGenerationFailed(e.to_string()))?;

        let tags = parse_tags(&reply, self.max_tags);
        if tags.is_empty() {
            return Err(DomainError::TagGenerationFailed(
                "model returned no keywords".into(),
            ));
        }
        Ok(tags)
    }
}

/// Split a keyword reply on commas/newlines, normalize and de-duplicate
pub fn parse_tags(reply: &str, max_tags: usize) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in reply.split([',', '\n']) {
        let tag = raw
            .trim()
            .trim_start_matches(['-', '*', '#'])
            .trim()
            .trim_matches(['"', '\'', '.'])
            .to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == max_tags {
            break;
        }
    }
    tags
}
