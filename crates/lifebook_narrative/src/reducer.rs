//! Sequential map + concatenate over fact chunks.

use derive_getters::Getters;
use lifebook_core::Chunk;
use lifebook_error::LifebookResult;
use lifebook_interface::{PromptChain, PromptInputs};
use lifebook_retry::{RetryExecutor, RetryOutcome};
use tracing::{debug, instrument, warn};

/// Input name the reducer fills with each chunk's bullet block.
pub const FACTS_INPUT: &str = "facts_bullets";

/// Result of reducing a set of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ReduceReport {
    /// Concatenated narrative
    narrative: String,
    /// Number of chunks processed
    chunks: usize,
    /// Chunks whose raw bullets were substituted after their chain call failed
    soft_failures: usize,
}

impl ReduceReport {
    /// Consume the report, returning the narrative.
    pub fn into_narrative(self) -> String {
        self.narrative
    }
}

/// Runs a chain over chunks one at a time and joins the outputs.
///
/// A single chunk is the whole answer and its failure is fatal. With more
/// than one chunk a failed chunk degrades to its raw bullet text so the
/// rest of the chapter still comes through.
#[derive(Debug, Clone)]
pub struct ChunkReducer {
    executor: RetryExecutor,
}

impl ChunkReducer {
    /// Create a reducer that runs every chain call through `executor`.
    pub fn new(executor: RetryExecutor) -> Self {
        Self { executor }
    }

    /// Reduce `chunks` with `chain`.
    ///
    /// `base_inputs` are passed to every call with [`FACTS_INPUT`] set to
    /// the chunk's bullets.
    ///
    /// # Errors
    ///
    /// Returns a generation error only when there is exactly one chunk and
    /// it fails after all retries.
    #[instrument(skip(self, chunks, chain, base_inputs), fields(chain = %chain.name(), chunks = chunks.len()))]
    pub async fn reduce(
        &self,
        chunks: &[Chunk],
        chain: &dyn PromptChain,
        base_inputs: &PromptInputs,
    ) -> LifebookResult<ReduceReport> {
        match chunks {
            [] => {
                debug!("No chunks to reduce");
                Ok(ReduceReport {
                    narrative: String::new(),
                    chunks: 0,
                    soft_failures: 0,
                })
            }
            [only] => {
                let inputs = base_inputs.clone().with(FACTS_INPUT, only.bullets());
                let narrative = self.executor.execute(|| chain.invoke(&inputs)).await?;
                Ok(ReduceReport {
                    narrative,
                    chunks: 1,
                    soft_failures: 0,
                })
            }
            many => {
                let mut outputs = Vec::with_capacity(many.len());
                let mut soft_failures = 0;

                for (index, chunk) in many.iter().enumerate() {
                    let bullets = chunk.bullets();
                    let inputs = base_inputs.clone().with(FACTS_INPUT, bullets.clone());

                    match self.executor.run(|| chain.invoke(&inputs)).await {
                        RetryOutcome::Success(text) => outputs.push(text),
                        failure => {
                            warn!(
                                chunk = index,
                                attempts = failure.attempts(),
                                outcome = ?failure,
                                "Chunk failed, substituting raw facts"
                            );
                            soft_failures += 1;
                            outputs.push(bullets);
                        }
                    }
                }

                debug!(soft_failures, "Reduced chunks");
                Ok(ReduceReport {
                    narrative: outputs.join("\n\n"),
                    chunks: many.len(),
                    soft_failures,
                })
            }
        }
    }
}
