//! Tag Generator Port
//!
//! Produces search keywords for a query. Optional and non-critical: gather
//! continues with no tags when generation fails.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

#[async_trait]
pub trait TagGenerator: Send + Sync {
    /// Keywords describing `context` (recent dialogue plus query)
    async fn generate_tags(&self, context: &str) -> Result<Vec<String>, DomainError>;
}
