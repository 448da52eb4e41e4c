//! Token estimation for chunking decisions.

use std::sync::Arc;

use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Approximates how many provider tokens a string will consume.
///
/// Uses the `cl100k_base` tokenizer when it loads, otherwise a quarter of
/// the character count. Callers only ever see a count; nothing downstream can tell
/// which path produced it.
///
/// # Examples
///
/// ```
/// use lifebook_core::TokenEstimator;
///
/// let estimator = TokenEstimator::heuristic();
/// assert_eq!(estimator.estimate("abcdefgh"), 2);
/// assert_eq!(estimator.estimate(""), 0);
/// ```
#[derive(Clone)]
pub struct TokenEstimator {
    tokenizer: Option<Arc<CoreBPE>>,
}

impl TokenEstimator {
    /// Load the exact tokenizer, falling back to the heuristic if it fails.
    pub fn new() -> Self {
        match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Self {
                tokenizer: Some(Arc::new(bpe)),
            },
            Err(e) => {
                debug!(error = %e, "Tokenizer unavailable, using length heuristic");
                Self::heuristic()
            }
        }
    }

    /// Estimator that always uses the characters / 4 heuristic.
    pub fn heuristic() -> Self {
        Self { tokenizer: None }
    }

    /// Build an estimator, exact when `exact` is set and the tokenizer loads.
    pub fn from_flag(exact: bool) -> Self {
        if exact { Self::new() } else { Self::heuristic() }
    }

    /// Whether the exact tokenizer is in use.
    pub fn is_exact(&self) -> bool {
        self.tokenizer.is_some()
    }

    /// Estimate the token count of `text`.
    pub fn estimate(&self, text: &str) -> usize {
        match &self.tokenizer {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.chars().count() / 4,
        }
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEstimator")
            .field("exact", &self.is_exact())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_divides_length_by_four() {
        let estimator = TokenEstimator::heuristic();
        assert_eq!(estimator.estimate("abc"), 0);
        assert_eq!(estimator.estimate(&"x".repeat(400)), 100);
        assert!(!estimator.is_exact());
    }

    #[test]
    fn heuristic_counts_characters_not_bytes() {
        let estimator = TokenEstimator::heuristic();
        // 19 characters, 35 UTF-8 bytes.
        assert_eq!(estimator.estimate("שלום עולם שלום עולם"), 4);
        assert_eq!(estimator.estimate("דוד"), 0);
    }

    #[test]
    fn exact_estimate_is_deterministic() {
        let estimator = TokenEstimator::new();
        let text = "This is a test text".repeat(10);
        let first = estimator.estimate(&text);
        assert!(first > 0);
        assert_eq!(first, estimator.estimate(&text));
    }

    #[test]
    fn exact_hello_world_is_small() {
        let estimator = TokenEstimator::new();
        let count = estimator.estimate("Hello, world!");
        assert!(count > 0);
        assert!(count < 10);
    }
}
