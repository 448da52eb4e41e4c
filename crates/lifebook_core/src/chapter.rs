//! Chapter metadata and generated chapter records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Chapter metadata supplied by the store.
///
/// `order` is assigned externally and is the only ordering the pipeline
/// trusts; generation time never decides chapter sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ChapterMeta {
    /// Chapter identifier
    id: String,
    /// Display title
    title: String,
    /// Position of the chapter in the book
    order: i32,
}

impl ChapterMeta {
    /// Create chapter metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }
}

/// Composite persistence key for a generated chapter.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("{}/{}", person_id, chapter_id)]
pub struct ChapterKey {
    /// Person the chapter belongs to
    pub person_id: String,
    /// Chapter identifier
    pub chapter_id: String,
}

impl ChapterKey {
    /// Create a key.
    pub fn new(person_id: impl Into<String>, chapter_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            chapter_id: chapter_id.into(),
        }
    }
}

/// Lifecycle of a chapter for one person.
///
/// `Absent -> Generating -> Generated` on success; a failed run falls back
/// to whatever was persisted before it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ChapterState {
    /// Nothing persisted
    #[display("absent")]
    Absent,
    /// A generation request is in flight
    #[display("generating")]
    Generating,
    /// A narrative is persisted
    #[display("generated")]
    Generated,
}

/// A narrative generated for one chapter of one person's book.
///
/// # Examples
///
/// ```
/// use lifebook_core::{ChapterMeta, GeneratedChapter};
///
/// let meta = ChapterMeta::new("2", "Childhood", 2);
/// let chapter = GeneratedChapter::new(&meta, "We lived by the sea.")
///     .with_summary("Seaside childhood.");
///
/// assert_eq!(*chapter.order(), 2);
/// assert!(chapter.has_summary());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GeneratedChapter {
    /// Chapter identifier
    chapter_id: String,
    /// Position of the chapter in the book
    order: i32,
    /// Display title
    title: String,
    /// Generated narrative text
    narrative: String,
    /// Short summary used to condition later chapters
    #[serde(default)]
    summary: Option<String>,
    /// Style guide the narrative was generated with
    #[serde(default)]
    style_guide: Option<String>,
    /// Context the chapter prompt was conditioned on
    #[serde(default)]
    context_summary: Option<String>,
    /// When generation finished
    generated_at: DateTime<Utc>,
}

impl GeneratedChapter {
    /// Create a record for `meta` holding `narrative`, stamped now.
    pub fn new(meta: &ChapterMeta, narrative: impl Into<String>) -> Self {
        Self {
            chapter_id: meta.id.clone(),
            order: meta.order,
            title: meta.title.clone(),
            narrative: narrative.into(),
            summary: None,
            style_guide: None,
            context_summary: None,
            generated_at: Utc::now(),
        }
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the style guide.
    pub fn with_style_guide(mut self, style_guide: Option<String>) -> Self {
        self.style_guide = style_guide;
        self
    }

    /// Builder method to set the context summary.
    pub fn with_context_summary(mut self, context_summary: Option<String>) -> Self {
        self.context_summary = context_summary;
        self
    }

    /// Builder method to override the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// True when a non-blank summary is present.
    pub fn has_summary(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|summary| !summary.trim().is_empty())
    }

    /// True when the narrative holds any non-whitespace text.
    pub fn has_narrative(&self) -> bool {
        !self.narrative.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_summary_counts_as_absent() {
        let meta = ChapterMeta::new("1", "Roots", 1);
        let chapter = GeneratedChapter::new(&meta, "text").with_summary("   ");
        assert!(!chapter.has_summary());
    }

    #[test]
    fn key_displays_person_and_chapter() {
        let key = ChapterKey::new("p-1", "3");
        assert_eq!(key.to_string(), "p-1/3");
    }

    #[test]
    fn round_trips_through_json_without_optional_fields() {
        let json = r#"{
            "chapter_id": "1",
            "order": 1,
            "title": "Roots",
            "narrative": "n",
            "generated_at": "2024-01-01T00:00:00Z"
        }"#;
        let chapter: GeneratedChapter = serde_json::from_str(json).unwrap();
        assert!(chapter.summary().is_none());
        assert_eq!(chapter.title(), "Roots");
    }
}
