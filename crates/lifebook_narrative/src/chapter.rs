//! Chapter generation: context, chunking, reduction, summary, persistence.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use derive_builder::Builder;
use derive_getters::Getters;
use lifebook_core::{ChapterKey, ChapterMeta, ChapterState, Fact, GeneratedChapter};
use lifebook_error::{GenerationError, GenerationErrorKind, LifebookResult};
use lifebook_interface::{PromptChain, PromptInputs, StoryRepository};
use lifebook_retry::RetryExecutor;
use tracing::{debug, info, instrument};

use crate::{ChunkReducer, Chunker, ContextChainer, KeyedLocks, SummaryGenerator};

/// Style text used when the caller gives none.
pub const NO_STYLE_GUIDE: &str = "No specific style guide.";

/// One request to generate (or regenerate) a chapter.
///
/// # Examples
///
/// ```
/// use lifebook_core::{ChapterMeta, Fact};
/// use lifebook_narrative::ChapterRequest;
///
/// let request = ChapterRequest::builder()
///     .person_id("p-1")
///     .meta(ChapterMeta::new("1", "Roots", 1))
///     .facts(vec![Fact::now("1-01", "I was born in Haifa")])
///     .style_guide("Warm, plain language")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.key().to_string(), "p-1/1");
/// assert!(!request.require_facts());
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct ChapterRequest {
    /// Person the chapter belongs to
    person_id: String,
    /// Chapter metadata
    meta: ChapterMeta,
    /// Facts in store order
    #[builder(default)]
    facts: Vec<Fact>,
    /// Optional style guide
    #[builder(default, setter(into, strip_option))]
    style_guide: Option<String>,
    /// Caller supplied context replacing computed chaining
    #[builder(default, setter(into, strip_option))]
    context_override: Option<String>,
    /// Reject empty fact sets with `NoInputData`
    #[builder(default)]
    require_facts: bool,
}

impl ChapterRequest {
    /// Creates a new builder for `ChapterRequest`.
    pub fn builder() -> ChapterRequestBuilder {
        ChapterRequestBuilder::default()
    }

    /// Persistence key for this request.
    pub fn key(&self) -> ChapterKey {
        ChapterKey::new(self.person_id.clone(), self.meta.id().clone())
    }
}

/// Removes a key from the in-flight set when dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<ChapterKey>>,
    key: ChapterKey,
}

impl<'a> InFlight<'a> {
    fn enter(set: &'a Mutex<HashSet<ChapterKey>>, key: ChapterKey) -> Self {
        set.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.clone());
        Self { set, key }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}

/// Generates chapter narratives and persists them with their summaries.
///
/// Requests for the same (person, chapter) key run one at a time; the later
/// one overwrites the earlier. Nothing is written unless both narrative and
/// summary were produced.
pub struct ChapterGenerator {
    chain: Arc<dyn PromptChain>,
    summaries: SummaryGenerator,
    repository: Arc<dyn StoryRepository>,
    chunker: Chunker,
    reducer: ChunkReducer,
    locks: KeyedLocks<ChapterKey>,
    in_flight: Mutex<HashSet<ChapterKey>>,
}

impl ChapterGenerator {
    /// Create a generator.
    ///
    /// `chain` receives `chapter_title`, `context_summary`, `facts_bullets`
    /// and `style_guide`.
    pub fn new(
        chain: Arc<dyn PromptChain>,
        summaries: SummaryGenerator,
        repository: Arc<dyn StoryRepository>,
        chunker: Chunker,
        executor: RetryExecutor,
    ) -> Self {
        Self {
            chain,
            summaries,
            repository,
            chunker,
            reducer: ChunkReducer::new(executor),
            locks: KeyedLocks::new(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Current lifecycle state of a chapter.
    pub async fn state(&self, key: &ChapterKey) -> LifebookResult<ChapterState> {
        let generating = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key);
        if generating {
            return Ok(ChapterState::Generating);
        }

        Ok(match self.repository.get_chapter(key).await? {
            Some(_) => ChapterState::Generated,
            None => ChapterState::Absent,
        })
    }

    /// Generate, summarize and persist one chapter.
    ///
    /// # Errors
    ///
    /// - `NoInputData` when `require_facts` is set and there are no facts
    /// - `GenerationFailed` when the chapter or summary chain fails on every attempt
    /// - storage errors from the repository
    #[instrument(skip(self, request), fields(key = %request.key(), order = request.meta().order(), facts = request.facts().len()))]
    pub async fn generate(&self, request: ChapterRequest) -> LifebookResult<GeneratedChapter> {
        if request.require_facts && request.facts.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::NoInputData(format!(
                "no facts for chapter {}",
                request.key()
            )))
            .into());
        }

        let key = request.key();
        let _guard = self.locks.acquire(&key).await;
        let _in_flight = InFlight::enter(&self.in_flight, key.clone());

        let context = match request.context_override.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => explicit.to_string(),
            _ => {
                let prior = self.repository.chapters_for(&request.person_id).await?;
                ContextChainer::build(*request.meta.order(), &prior, None)
            }
        };

        let chunks = self.chunker.chunk(&request.facts);
        let inputs = PromptInputs::new()
            .with("chapter_title", request.meta.title().clone())
            .with("context_summary", context.clone())
            .with(
                "style_guide",
                request
                    .style_guide
                    .clone()
                    .unwrap_or_else(|| NO_STYLE_GUIDE.to_string()),
            );

        let report = self
            .reducer
            .reduce(&chunks, self.chain.as_ref(), &inputs)
            .await?;
        debug!(
            chunks = report.chunks(),
            soft_failures = report.soft_failures(),
            "Chapter narrative reduced"
        );

        let narrative = report.into_narrative().trim().to_string();
        let summary = self.summaries.summarize(&narrative).await?;

        let chapter = GeneratedChapter::new(&request.meta, narrative)
            .with_summary(summary)
            .with_style_guide(request.style_guide)
            .with_context_summary(Some(context));

        self.repository.put_chapter(&key, chapter.clone()).await?;
        info!(narrative_len = chapter.narrative().len(), "Chapter generated");

        Ok(chapter)
    }

    /// Read back a persisted chapter.
    pub async fn chapter(&self, key: &ChapterKey) -> LifebookResult<Option<GeneratedChapter>> {
        self.repository.get_chapter(key).await
    }
}

impl std::fmt::Debug for ChapterGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChapterGenerator")
            .field("chain", &self.chain.name())
            .field("summaries", &self.summaries)
            .field("chunker", &self.chunker)
            .field("reducer", &self.reducer)
            .finish()
    }
}
