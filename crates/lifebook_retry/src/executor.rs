//! Bounded retry with per-attempt timeout and exponential backoff.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lifebook_error::{GenerationError, GenerationErrorKind, LifebookError, LifebookResult};
use tokio_retry2::{Retry, RetryError, strategy::jitter};
use tracing::{debug, instrument, warn};

use crate::RetryConfig;

/// How a retried operation ended.
///
/// Callers decide what a failure means for them: the chunk reducer degrades
/// gracefully, the chapter and book paths surface an error.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// An attempt succeeded
    Success(T),
    /// The final attempt exceeded the per-attempt timeout
    Timeout {
        /// Attempts made
        attempts: usize,
        /// Timeout that elapsed
        after: Duration,
    },
    /// The final attempt failed with a provider error
    ProviderError {
        /// Attempts made
        attempts: usize,
        /// Last error, preserved for diagnostics
        error: LifebookError,
    },
    /// No attempt ran (`max_retries == 0`)
    Exhausted,
}

impl<T> RetryOutcome<T> {
    /// True for [`RetryOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success(_))
    }

    /// Number of attempts made.
    ///
    /// `None` for a success, since the executor does not track that count
    /// once a value is in hand.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            RetryOutcome::Success(_) => None,
            RetryOutcome::Timeout { attempts, .. } | RetryOutcome::ProviderError { attempts, .. } => {
                Some(*attempts)
            }
            RetryOutcome::Exhausted => Some(0),
        }
    }

    /// The successful value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            RetryOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Convert into a result, mapping every failure to a generation error.
    pub fn into_result(self) -> LifebookResult<T> {
        match self {
            RetryOutcome::Success(value) => Ok(value),
            RetryOutcome::Timeout { attempts, after } => {
                Err(GenerationError::new(GenerationErrorKind::GenerationFailed {
                    attempts,
                    message: format!("timed out after {} ms", after.as_millis()),
                })
                .into())
            }
            RetryOutcome::ProviderError { attempts, error } => {
                Err(GenerationError::new(GenerationErrorKind::GenerationFailed {
                    attempts,
                    message: error.to_string(),
                })
                .into())
            }
            RetryOutcome::Exhausted => {
                Err(GenerationError::new(GenerationErrorKind::RetryExhausted).into())
            }
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptFailure {
    Timeout(Duration),
    Provider(LifebookError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Timeout(after) => write!(f, "timed out after {} ms", after.as_millis()),
            AttemptFailure::Provider(err) => write!(f, "{}", err),
        }
    }
}

/// Runs an async operation up to `max_retries` times.
///
/// Each attempt is bounded by `timeout`. After failed attempt `n` (0-based)
/// the executor sleeps `base_delay * 2^n`, capped at `max_delay`, unless it
/// was the last attempt. Every failure is treated as transient.
///
/// # Example
///
/// ```no_run
/// use lifebook_retry::{RetryConfig, RetryExecutor};
///
/// # async fn example() -> lifebook_error::LifebookResult<()> {
/// let executor = RetryExecutor::new(&RetryConfig::default());
/// let text = executor
///     .execute(|| async { Ok::<_, lifebook_error::LifebookError>("done".to_string()) })
///     .await?;
/// assert_eq!(text, "done");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    max_retries: usize,
    timeout: Duration,
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl RetryExecutor {
    /// Create an executor from configuration.
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            timeout: config.timeout(),
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
            jitter: config.jitter,
        }
    }

    /// Override the number of attempts.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the first backoff delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Total attempts allowed.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sleeps between attempts, one fewer than `max_retries`.
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries.saturating_sub(1))
            .map(|n| {
                let factor = 2u32.saturating_pow(n.min(u32::MAX as usize) as u32);
                self.base_delay
                    .checked_mul(factor)
                    .unwrap_or(self.max_delay)
                    .min(self.max_delay)
            })
            .map(|delay| if self.jitter { jitter(delay) } else { delay })
            .collect()
    }

    /// Run `operation` with retries and report how it ended.
    #[instrument(skip(self, operation), fields(max_retries = self.max_retries, timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn run<F, Fut, T>(&self, operation: F) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LifebookResult<T>>,
    {
        if self.max_retries == 0 {
            warn!("Retry executor configured with zero attempts");
            return RetryOutcome::Exhausted;
        }

        let delays = self.delays();
        let attempts = AtomicUsize::new(0);
        let attempts_ref = &attempts;
        let delays_ref = &delays;
        let timeout = self.timeout;
        let mut operation = operation;

        let result = Retry::spawn(delays.clone(), move || {
            let attempt = attempts_ref.fetch_add(1, Ordering::SeqCst);
            // A fresh future per attempt.
            let pending = operation();

            async move {
                let failure = match tokio::time::timeout(timeout, pending).await {
                    Ok(Ok(value)) => {
                        debug!(attempt = attempt + 1, "Attempt succeeded");
                        return Ok(value);
                    }
                    Ok(Err(err)) => AttemptFailure::Provider(err),
                    Err(_) => AttemptFailure::Timeout(timeout),
                };

                match delays_ref.get(attempt) {
                    Some(delay) => warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "Attempt failed, backing off"
                    ),
                    None => warn!(attempt = attempt + 1, error = %failure, "Final attempt failed"),
                }

                Err(RetryError::Transient {
                    err: failure,
                    retry_after: None,
                })
            }
        })
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        match result {
            Ok(value) => RetryOutcome::Success(value),
            Err(AttemptFailure::Timeout(after)) => RetryOutcome::Timeout { attempts, after },
            Err(AttemptFailure::Provider(error)) => RetryOutcome::ProviderError { attempts, error },
        }
    }

    /// Run `operation` with retries, surfacing failure as a generation error.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> LifebookResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LifebookResult<T>>,
    {
        self.run(operation).await.into_result()
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
