//! Token-bounded groups of facts.

use crate::{Fact, render_bullets};
use derive_getters::Getters;

/// An ordered group of facts processed as one generation unit.
///
/// `tokens` is the estimate accumulated while the chunk was built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct Chunk {
    facts: Vec<Fact>,
    tokens: usize,
}

impl Chunk {
    /// Create an empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunk from facts with a precomputed token estimate.
    pub fn from_facts(facts: Vec<Fact>, tokens: usize) -> Self {
        Self { facts, tokens }
    }

    /// Append a fact and its estimate.
    pub fn push(&mut self, fact: Fact, tokens: usize) {
        self.facts.push(fact);
        self.tokens += tokens;
    }

    /// True when the chunk holds no facts.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Number of facts in the chunk.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Bullet block for this chunk (`"- a\n- b"`).
    pub fn bullets(&self) -> String {
        render_bullets(&self.facts)
    }

    /// Consume the chunk, returning its facts.
    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }
}
