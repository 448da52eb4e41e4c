//! Text-generation provider errors.

/// Failure conditions raised by a provider call.
///
/// All of these are retried by the retry executor; the terminal failure is
/// surfaced to callers wrapped in a generation error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// API key not configured for the selected provider
    #[display("{} API key not set", _0)]
    MissingApiKey(String),
    /// Request could not be sent or the connection failed
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Provider answered with a non-success status
    #[display("API returned HTTP {}: {}", status, message)]
    ApiStatus {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Request body could not be assembled
    #[display("Failed to build request: {}", _0)]
    Builder(String),
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Response contained no text
    #[display("Provider returned an empty response")]
    EmptyResponse,
    /// Attempt exceeded the configured per-attempt timeout
    #[display("Provider call timed out after {} ms", _0)]
    Timeout(u64),
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use lifebook_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::ApiStatus {
///     status: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
