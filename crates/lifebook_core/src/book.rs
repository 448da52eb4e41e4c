//! Compiled book record.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// The whole book for one person. Overwritten on each compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CompiledBook {
    /// Book text returned by the compile chain
    book_text: String,
    /// Number of chapters fed into the compilation
    chapters_used: usize,
    /// When the compilation finished
    compiled_at: DateTime<Utc>,
    /// Caller supplied style guide, if any
    style_guide: Option<String>,
}

impl CompiledBook {
    /// Create a book record stamped with the current time.
    pub fn new(
        book_text: impl Into<String>,
        chapters_used: usize,
        style_guide: Option<String>,
    ) -> Self {
        Self {
            book_text: book_text.into(),
            chapters_used,
            compiled_at: Utc::now(),
            style_guide,
        }
    }
}
