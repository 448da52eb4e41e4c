//! Shared value types for the pipeline ports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named string inputs for a prompt template.
///
/// # Examples
///
/// ```
/// use lifebook_interface::PromptInputs;
///
/// let inputs = PromptInputs::new()
///     .with("chapter_title", "Roots")
///     .with("facts_bullets", "- A\n- B");
///
/// assert_eq!(inputs.get("chapter_title"), Some("Roots"));
/// assert!(inputs.get("style_guide").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptInputs {
    values: BTreeMap<String, String>,
}

impl PromptInputs {
    /// Create an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add one input.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace one input.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up an input by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Input names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no inputs are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
