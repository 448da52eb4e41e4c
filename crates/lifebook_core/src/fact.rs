//! Facts: the short first-person answers a chapter is written from.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One recorded answer to a biographical question.
///
/// Facts are immutable once handed to the pipeline. Their order is the
/// order supplied by the store (ascending `created_at`).
///
/// # Examples
///
/// ```
/// use lifebook_core::Fact;
///
/// let fact = Fact::now("1-01", "I was born in Haifa");
/// assert_eq!(fact.bullet(), "- I was born in Haifa");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Fact {
    /// Identifier of the question this fact answers
    question_id: String,
    /// Answer text
    text: String,
    /// When the answer was recorded
    created_at: DateTime<Utc>,
}

impl Fact {
    /// Create a fact with an explicit timestamp.
    pub fn new(
        question_id: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            text: text.into(),
            created_at,
        }
    }

    /// Create a fact stamped with the current time.
    pub fn now(question_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(question_id, text, Utc::now())
    }

    /// Render this fact as a one-line bullet.
    pub fn bullet(&self) -> String {
        format!("- {}", self.text)
    }
}

/// Render facts as a bullet block, one fact per line.
pub fn render_bullets<'a>(facts: impl IntoIterator<Item = &'a Fact>) -> String {
    facts
        .into_iter()
        .map(Fact::bullet)
        .collect::<Vec<_>>()
        .join("\n")
}
