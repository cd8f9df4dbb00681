//! Completion Provider Port
//!
//! Abstract interface for LLM text completion, used for summaries and tags.
//! Providers may expose a cheaper "fast" model next to the regular one.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// LLM completion interface
///
/// # Example
///
/// ```rust,ignore
/// use kioku::ports::CompletionProvider;
///
/// struct GeminiProvider { /* ... */ }
///
/// #[async_trait]
/// impl CompletionProvider for GeminiProvider {
///     async fn complete(&self, prompt: &str, use_fast_model: bool)
///         -> Result<String, DomainError> {
///         // Call Gemini API
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a single prompt, optionally on the fast model
    async fn complete(&self, prompt: &str, use_fast_model: bool) -> Result<String, DomainError>;

    /// Get the provider name (e.g., "gemini", "openai")
    fn provider_name(&self) -> &str;

    /// Get the model ID used for the given tier
    fn model_id(&self, use_fast_model: bool) -> &str;
}
