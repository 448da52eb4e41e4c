//! Port traits for providers, prompt chains and persistence.

use crate::PromptInputs;
use async_trait::async_trait;
use lifebook_core::{ChapterKey, CompiledBook, GeneratedChapter};
use lifebook_error::LifebookResult;

/// A text-generation provider: one rendered prompt in, generated text out.
///
/// Implementations are chosen once at construction time. A call may fail
/// or hang; timeouts and retries are applied by the caller.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for a fully rendered prompt.
    async fn complete(&self, prompt: &str) -> LifebookResult<String>;

    /// Provider name (e.g., "openai", "anthropic").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Render a template with named inputs, call a provider, parse the output.
///
/// Every generation step of the pipeline (chapter, summary, compile) goes
/// through one of these. Each call is a fresh operation, so a chain can be
/// invoked again on retry.
#[async_trait]
pub trait PromptChain: Send + Sync {
    /// Run the chain once.
    async fn invoke(&self, inputs: &PromptInputs) -> LifebookResult<String>;

    /// Chain name used in logs.
    fn name(&self) -> &str;
}

/// Persistence port for generated chapters and compiled books.
///
/// Writes are idempotent overwrites: one chapter per (person, chapter) key
/// and one book per person.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Fetch one generated chapter.
    async fn get_chapter(&self, key: &ChapterKey) -> LifebookResult<Option<GeneratedChapter>>;

    /// Store a generated chapter, replacing any previous one for `key`.
    async fn put_chapter(&self, key: &ChapterKey, chapter: GeneratedChapter)
    -> LifebookResult<()>;

    /// All generated chapters for a person, in no particular order.
    async fn chapters_for(&self, person_id: &str) -> LifebookResult<Vec<GeneratedChapter>>;

    /// Fetch the compiled book for a person.
    async fn get_book(&self, person_id: &str) -> LifebookResult<Option<CompiledBook>>;

    /// Store a compiled book, replacing any previous one.
    async fn put_book(&self, person_id: &str, book: CompiledBook) -> LifebookResult<()>;
}
