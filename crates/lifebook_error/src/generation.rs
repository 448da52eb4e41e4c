//! Generation pipeline error types.

/// Specific error conditions for chapter, summary and book generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Precondition failure: nothing to generate from
    #[display("No input data: {}", _0)]
    NoInputData(String),
    /// Provider failed on every allowed attempt
    #[display("Generation failed after {} attempt(s): {}", attempts, message)]
    GenerationFailed {
        /// Number of attempts made
        attempts: usize,
        /// Display form of the last failure
        message: String,
    },
    /// Retry loop finished without running a single attempt
    #[display("Retry exhausted without attempt (max_retries = 0)")]
    RetryExhausted,
    /// Prompt template could not be rendered
    #[display("Template error: {}", _0)]
    Template(String),
}

/// Error type for generation operations.
///
/// # Examples
///
/// ```
/// use lifebook_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::RetryExhausted);
/// assert!(format!("{}", err).contains("without attempt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
