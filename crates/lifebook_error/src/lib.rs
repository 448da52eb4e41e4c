//! Error types for the Lifebook pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Everything converts into [`LifebookError`], so `?` works across crates.
//!
//! # Examples
//!
//! ```
//! use lifebook_error::{GenerationError, GenerationErrorKind, LifebookResult};
//!
//! fn compile() -> LifebookResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::NoInputData(
//!         "no chapters to compile".to_string(),
//!     )))?
//! }
//!
//! assert!(compile().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod provider;
mod storage;

pub use config::ConfigError;
pub use error::{LifebookError, LifebookErrorKind, LifebookResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
