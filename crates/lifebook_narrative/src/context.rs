//! Cross-chapter context from prior chapter summaries.

use lifebook_core::GeneratedChapter;

/// Context used when no earlier chapter has a summary.
pub const NO_PRIOR_SUMMARIES: &str = "No summary of previous chapters.";

/// Builds the "story so far" text a chapter prompt is conditioned on.
///
/// Only chapters strictly earlier in book order that carry a non-blank
/// summary contribute. Generation time plays no part.
///
/// # Examples
///
/// ```
/// use lifebook_core::{ChapterMeta, GeneratedChapter};
/// use lifebook_narrative::{ContextChainer, NO_PRIOR_SUMMARIES};
///
/// let first = GeneratedChapter::new(&ChapterMeta::new("1", "Roots", 1), "...")
///     .with_summary("Born by the sea.");
///
/// assert_eq!(ContextChainer::build(2, &[first.clone()], None), "1 (Roots): Born by the sea.");
/// assert_eq!(ContextChainer::build(1, &[first], None), NO_PRIOR_SUMMARIES);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextChainer;

impl ContextChainer {
    /// Context for the chapter at `target_order`.
    ///
    /// A non-blank `explicit` context replaces the computed one.
    pub fn build(target_order: i32, prior: &[GeneratedChapter], explicit: Option<&str>) -> String {
        if let Some(explicit) = explicit.filter(|text| !text.trim().is_empty()) {
            return explicit.to_string();
        }

        let mut earlier: Vec<&GeneratedChapter> = prior
            .iter()
            .filter(|chapter| *chapter.order() < target_order && chapter.has_summary())
            .collect();

        if earlier.is_empty() {
            return NO_PRIOR_SUMMARIES.to_string();
        }

        earlier.sort_by_key(|chapter| *chapter.order());
        earlier
            .iter()
            .map(|chapter| {
                format!(
                    "{} ({}): {}",
                    chapter.chapter_id(),
                    chapter.title(),
                    chapter.summary().as_deref().unwrap_or_default().trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifebook_core::ChapterMeta;

    fn chapter(order: i32, summary: Option<&str>) -> GeneratedChapter {
        let meta = ChapterMeta::new(order.to_string(), format!("Title {}", order), order);
        let chapter = GeneratedChapter::new(&meta, "narrative");
        match summary {
            Some(s) => chapter.with_summary(s),
            None => chapter,
        }
    }

    #[test]
    fn only_earlier_summarized_chapters_in_order() {
        let prior = vec![
            chapter(3, Some("third")),
            chapter(2, None),
            chapter(1, Some("first")),
            chapter(4, Some("fourth")),
        ];

        let context = ContextChainer::build(4, &prior, None);
        assert_eq!(context, "1 (Title 1): first\n\n3 (Title 3): third");
    }

    #[test]
    fn first_chapter_gets_fallback() {
        let prior = vec![chapter(1, Some("first")), chapter(2, Some("second"))];
        assert_eq!(ContextChainer::build(1, &prior, None), NO_PRIOR_SUMMARIES);
    }

    #[test]
    fn blank_summaries_are_skipped() {
        let prior = vec![chapter(1, Some("   "))];
        assert_eq!(ContextChainer::build(2, &prior, None), NO_PRIOR_SUMMARIES);
    }

    #[test]
    fn explicit_context_overrides() {
        let prior = vec![chapter(1, Some("first"))];
        assert_eq!(
            ContextChainer::build(2, &prior, Some("caller context")),
            "caller context"
        );
        // Blank override falls through to computed context.
        assert_eq!(
            ContextChainer::build(2, &prior, Some("  ")),
            "1 (Title 1): first"
        );
    }
}
