//! Chapter summaries for downstream context.

use std::sync::Arc;

use lifebook_error::LifebookResult;
use lifebook_interface::{PromptChain, PromptInputs};
use lifebook_retry::RetryExecutor;
use tracing::{debug, instrument};

/// Condenses a chapter narrative into a short summary.
#[derive(Clone)]
pub struct SummaryGenerator {
    chain: Arc<dyn PromptChain>,
    executor: RetryExecutor,
}

impl SummaryGenerator {
    /// Create a generator using `chain` (input: `narrative`).
    pub fn new(chain: Arc<dyn PromptChain>, executor: RetryExecutor) -> Self {
        Self { chain, executor }
    }

    /// Summarize `narrative`.
    ///
    /// A blank narrative yields an empty summary without calling the chain.
    ///
    /// # Errors
    ///
    /// Returns a generation error if the chain fails on every attempt.
    #[instrument(skip(self, narrative), fields(narrative_len = narrative.len()))]
    pub async fn summarize(&self, narrative: &str) -> LifebookResult<String> {
        if narrative.trim().is_empty() {
            debug!("Blank narrative, skipping summary");
            return Ok(String::new());
        }

        let inputs = PromptInputs::new().with("narrative", narrative);
        let summary = self
            .executor
            .execute(|| self.chain.invoke(&inputs))
            .await?;

        Ok(summary.trim().to_string())
    }
}

impl std::fmt::Debug for SummaryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryGenerator")
            .field("chain", &self.chain.name())
            .field("executor", &self.executor)
            .finish()
    }
}
