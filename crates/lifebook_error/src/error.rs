//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, GenerationErrorKind, JsonError, ProviderError, StorageError,
};

/// Every error condition the pipeline can surface.
///
/// # Examples
///
/// ```
/// use lifebook_error::{LifebookError, ConfigError};
///
/// let err: LifebookError = ConfigError::new("missing provider").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LifebookErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Provider call error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Generation pipeline error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Persistence adapter error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Lifebook error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Lifebook Error: {}", _0)]
pub struct LifebookError(Box<LifebookErrorKind>);

impl LifebookError {
    /// Create a new error from a kind.
    pub fn new(kind: LifebookErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LifebookErrorKind {
        &self.0
    }

    /// Generation error kind, if this is a generation error.
    pub fn generation_kind(&self) -> Option<&GenerationErrorKind> {
        match self.kind() {
            LifebookErrorKind::Generation(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// True when the error is a client-visible precondition failure.
    pub fn is_no_input_data(&self) -> bool {
        matches!(
            self.generation_kind(),
            Some(GenerationErrorKind::NoInputData(_))
        )
    }

    /// True when a top-level operation exhausted its provider attempts.
    pub fn is_generation_failed(&self) -> bool {
        matches!(
            self.generation_kind(),
            Some(GenerationErrorKind::GenerationFailed { .. })
        )
    }
}

// Generic From implementation for any type that converts to LifebookErrorKind
impl<T> From<T> for LifebookError
where
    T: Into<LifebookErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Lifebook operations.
pub type LifebookResult<T> = std::result::Result<T, LifebookError>;
