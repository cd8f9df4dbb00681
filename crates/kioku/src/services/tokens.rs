//! Heuristic token estimation (~4 characters per token)

use crate::ports::TokenEstimator;

const CHARS_PER_TOKEN: usize = 4;

/// Character-count based estimator, adequate for budgeting decisions
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenEstimator;

impl TokenEstimator for HeuristicTokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        let est = HeuristicTokenEstimator;
        assert_eq!(est.estimate(""), 0);
        assert_eq!(est.estimate("abc"), 1);
        assert_eq!(est.estimate("abcd"), 1);
        assert_eq!(est.estimate("abcde"), 2);
        assert_eq!(est.estimate_all(&["abcd", "abcde"]), 3);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 4 multi-byte characters
        assert_eq!(HeuristicTokenEstimator.estimate("記憶海図"), 1);
    }
}
