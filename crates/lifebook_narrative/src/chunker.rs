//! Token-budgeted fact chunking.

use lifebook_core::{Chunk, Fact, TokenEstimator, render_bullets};
use lifebook_retry::ChunkingConfig;
use tracing::{debug, instrument};

/// Splits an ordered fact list into token-bounded chunks.
///
/// Greedy, single pass, order preserving. A fact whose own estimate exceeds
/// the target becomes a one-fact chunk; nothing is dropped or truncated.
#[derive(Debug, Clone)]
pub struct Chunker {
    estimator: TokenEstimator,
    target_tokens: usize,
    skip_threshold: usize,
}

impl Chunker {
    /// Create a chunker with explicit thresholds.
    pub fn new(estimator: TokenEstimator, target_tokens: usize, skip_threshold: usize) -> Self {
        Self {
            estimator,
            target_tokens,
            skip_threshold,
        }
    }

    /// Create a chunker from configuration.
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(
            TokenEstimator::from_flag(config.exact_tokenizer),
            config.chunk_target_tokens,
            config.skip_threshold,
        )
    }

    /// The estimator used for budgeting.
    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Split `facts` into chunks.
    ///
    /// Fact sets at or below the skip threshold (including the empty set)
    /// come back as a single chunk.
    #[instrument(skip(self, facts), fields(facts = facts.len()))]
    pub fn chunk(&self, facts: &[Fact]) -> Vec<Chunk> {
        let total = self.estimator.estimate(&render_bullets(facts));
        if total <= self.skip_threshold {
            debug!(total, "Facts fit in a single chunk");
            return vec![Chunk::from_facts(facts.to_vec(), total)];
        }

        let mut chunks = Vec::new();
        let mut current = Chunk::new();

        for fact in facts {
            let tokens = self.estimator.estimate(&format!("{}\n", fact.bullet()));
            if !current.is_empty() && current.tokens() + tokens > self.target_tokens {
                chunks.push(std::mem::take(&mut current));
            }
            current.push(fact.clone(), tokens);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        debug!(total, chunks = chunks.len(), "Split facts into chunks");
        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(texts: &[&str]) -> Vec<Fact> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Fact::now(format!("q{}", i), *t))
            .collect()
    }

    fn heuristic(target: usize, threshold: usize) -> Chunker {
        Chunker::new(TokenEstimator::heuristic(), target, threshold)
    }

    #[test]
    fn empty_input_is_one_empty_chunk() {
        let chunks = heuristic(1200, 1500).chunk(&[]);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
        assert_eq!(chunks[0].bullets(), "");
    }

    #[test]
    fn below_threshold_is_single_chunk_in_order() {
        let input = facts(&["A", "B", "C"]);
        let chunks = heuristic(1, 1500).chunk(&input);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].bullets(), "- A\n- B\n- C");
    }

    #[test]
    fn oversized_fact_forms_its_own_chunk() {
        // Each small bullet "- xx...\n" is 40 characters -> 10 tokens; big one is 100.
        let small = "x".repeat(37);
        let big = "y".repeat(397);
        let input = facts(&[&small, &big, &small]);
        let chunks = heuristic(25, 20).chunk(&input);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].len(), 1);
        assert_eq!(chunks[1].facts()[0].text(), &big);
    }
}
