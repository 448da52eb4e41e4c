//! Book compilation from persisted chapters.

use std::sync::Arc;

use lifebook_core::{CompiledBook, GeneratedChapter};
use lifebook_error::{GenerationError, GenerationErrorKind, LifebookResult};
use lifebook_interface::{PromptChain, PromptInputs, StoryRepository};
use lifebook_retry::RetryExecutor;
use tracing::{info, instrument};

use crate::{KeyedLocks, NO_STYLE_GUIDE};

/// Timeline input sent to the compile chain until timelines are extracted from facts.
pub const TIMELINE_PLACEHOLDER: &str = "Timeline not available.";

/// Render chapters as `"## {title}\n\n{narrative}"` blocks in book order.
///
/// Chapters with a blank narrative are skipped. Returns the text and the
/// number of chapters it contains.
pub fn render_chapters(chapters: &[GeneratedChapter]) -> (String, usize) {
    let mut ordered: Vec<&GeneratedChapter> =
        chapters.iter().filter(|c| c.has_narrative()).collect();
    ordered.sort_by_key(|c| *c.order());

    let text = ordered
        .iter()
        .map(|c| format!("## {}\n\n{}", c.title(), c.narrative()))
        .collect::<Vec<_>>()
        .join("\n\n");
    (text, ordered.len())
}

/// Compiles every generated chapter for a person into one book.
pub struct BookCompiler {
    chain: Arc<dyn PromptChain>,
    repository: Arc<dyn StoryRepository>,
    executor: RetryExecutor,
    locks: KeyedLocks<String>,
}

impl BookCompiler {
    /// Create a compiler.
    ///
    /// `chain` receives `style_guide`, `chapter_summaries` and `timeline`.
    pub fn new(
        chain: Arc<dyn PromptChain>,
        repository: Arc<dyn StoryRepository>,
        executor: RetryExecutor,
    ) -> Self {
        Self {
            chain,
            repository,
            executor,
            locks: KeyedLocks::new(),
        }
    }

    /// Compile and persist the book for `person_id`.
    ///
    /// Chapters are ordered by their `order`, never by generation time.
    ///
    /// # Errors
    ///
    /// - `NoInputData` when the person has no chapter with a narrative
    /// - `GenerationFailed` when the compile chain fails on every attempt
    #[instrument(skip(self, style_guide), fields(styled = style_guide.is_some()))]
    pub async fn compile(
        &self,
        person_id: &str,
        style_guide: Option<&str>,
    ) -> LifebookResult<CompiledBook> {
        let _guard = self.locks.acquire(&person_id.to_string()).await;

        let chapters = self.repository.chapters_for(person_id).await?;
        let (chapter_text, chapters_used) = render_chapters(&chapters);
        if chapters_used == 0 {
            return Err(GenerationError::new(GenerationErrorKind::NoInputData(format!(
                "no generated chapters for {}",
                person_id
            )))
            .into());
        }

        let inputs = PromptInputs::new()
            .with("style_guide", style_guide.unwrap_or(NO_STYLE_GUIDE))
            .with("chapter_summaries", chapter_text)
            .with("timeline", TIMELINE_PLACEHOLDER);

        let book_text = self
            .executor
            .execute(|| self.chain.invoke(&inputs))
            .await?
            .trim()
            .to_string();

        let book = CompiledBook::new(book_text, chapters_used, style_guide.map(str::to_string));
        self.repository.put_book(person_id, book.clone()).await?;
        info!(chapters_used, book_len = book.book_text().len(), "Book compiled");

        Ok(book)
    }

    /// The most recently compiled book, if any.
    pub async fn latest(&self, person_id: &str) -> LifebookResult<Option<CompiledBook>> {
        self.repository.get_book(person_id).await
    }
}

impl std::fmt::Debug for BookCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookCompiler")
            .field("chain", &self.chain.name())
            .field("executor", &self.executor)
            .finish()
    }
}
