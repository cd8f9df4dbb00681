//! Token Estimator Port
//!
//! Approximate token counting, used only to decide when and how much to
//! compress. Must be pure and cheap.

pub trait TokenEstimator: Send + Sync {
    /// Estimated tokens in `text`
    fn estimate(&self, text: &str) -> usize;

    /// Estimated tokens across all `parts`
    fn estimate_all(&self, parts: &[&str]) -> usize {
        parts.iter().map(|p| self.estimate(p)).sum()
    }
}
