//! Wiring the generators together from configuration.

use std::path::Path;
use std::sync::Arc;

use lifebook_core::{ChapterKey, ChapterState, CompiledBook, GeneratedChapter};
use lifebook_error::LifebookResult;
use lifebook_interface::{PromptChain, StoryRepository, TextProvider};
use lifebook_retry::{LifebookConfig, PromptsConfig, RetryExecutor};
use tracing::{debug, instrument};

use crate::{
    BookCompiler, CHAPTER_TEMPLATE, COMPILE_TEMPLATE, ChapterGenerator, ChapterRequest, Chunker,
    PromptTemplate, SUMMARY_TEMPLATE, SummaryGenerator, TemplateChain,
};

/// The three chains a pipeline runs.
#[derive(Clone)]
pub struct PipelineChains {
    /// Chapter narrative chain
    pub chapter: Arc<dyn PromptChain>,
    /// Chapter summary chain
    pub summary: Arc<dyn PromptChain>,
    /// Book compilation chain
    pub compile: Arc<dyn PromptChain>,
}

impl PipelineChains {
    /// Template chains over `provider`, using bundled or overridden templates.
    ///
    /// # Errors
    ///
    /// Returns a template error if an override file cannot be read or parsed.
    pub fn from_templates(
        prompts: &PromptsConfig,
        provider: Arc<dyn TextProvider>,
    ) -> LifebookResult<Self> {
        let load = |name: &str, path: Option<&Path>, bundled: &str| match path {
            Some(path) => PromptTemplate::from_file(name, path),
            None => PromptTemplate::parse(name, bundled),
        };

        let chapter = load("chapter", prompts.chapter.as_deref(), CHAPTER_TEMPLATE)?;
        let summary = load("summary", prompts.summary.as_deref(), SUMMARY_TEMPLATE)?;
        let compile = load("compile", prompts.compile.as_deref(), COMPILE_TEMPLATE)?;

        Ok(Self {
            chapter: Arc::new(TemplateChain::new(chapter, provider.clone())),
            summary: Arc::new(TemplateChain::new(summary, provider.clone())),
            compile: Arc::new(TemplateChain::new(compile, provider)),
        })
    }
}

/// Chapter generation and book compilation over one repository.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use lifebook_core::{ChapterMeta, Fact};
/// use lifebook_models::create_provider;
/// use lifebook_narrative::{ChapterRequest, NarrativePipeline};
/// use lifebook_retry::LifebookConfig;
/// use lifebook_storage::InMemoryStoryRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LifebookConfig::load()?;
/// let provider = create_provider(&config.provider)?;
/// let pipeline =
///     NarrativePipeline::from_config(&config, provider, Arc::new(InMemoryStoryRepository::new()))?;
///
/// let request = ChapterRequest::builder()
///     .person_id("p-1")
///     .meta(ChapterMeta::new("1", "Roots", 1))
///     .facts(vec![Fact::now("1-01", "I was born in Haifa")])
///     .build()?;
/// let chapter = pipeline.generate_chapter(request).await?;
/// let book = pipeline.compile_book("p-1", None).await?;
/// # Ok(())
/// # }
/// ```
pub struct NarrativePipeline {
    chapters: ChapterGenerator,
    books: BookCompiler,
}

impl NarrativePipeline {
    /// Assemble a pipeline from explicit parts.
    pub fn new(
        chains: PipelineChains,
        repository: Arc<dyn StoryRepository>,
        chunker: Chunker,
        executor: RetryExecutor,
    ) -> Self {
        let summaries = SummaryGenerator::new(chains.summary, executor.clone());
        let chapters = ChapterGenerator::new(
            chains.chapter,
            summaries,
            repository.clone(),
            chunker,
            executor.clone(),
        );
        let books = BookCompiler::new(chains.compile, repository, executor);
        Self { chapters, books }
    }

    /// Assemble a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a template
    /// override cannot be loaded.
    #[instrument(skip_all, fields(provider = provider.provider_name(), model = provider.model_name()))]
    pub fn from_config(
        config: &LifebookConfig,
        provider: Arc<dyn TextProvider>,
        repository: Arc<dyn StoryRepository>,
    ) -> LifebookResult<Self> {
        config.validate()?;
        let chains = PipelineChains::from_templates(&config.prompts, provider)?;
        let chunker = Chunker::from_config(&config.chunking);
        debug!(exact_tokenizer = chunker.estimator().is_exact(), "Pipeline configured");

        Ok(Self::new(
            chains,
            repository,
            chunker,
            RetryExecutor::new(&config.retry),
        ))
    }

    /// Generate and persist a chapter.
    pub async fn generate_chapter(&self, request: ChapterRequest) -> LifebookResult<GeneratedChapter> {
        self.chapters.generate(request).await
    }

    /// Lifecycle state of a chapter.
    pub async fn chapter_state(&self, key: &ChapterKey) -> LifebookResult<ChapterState> {
        self.chapters.state(key).await
    }

    /// A persisted chapter.
    pub async fn chapter(&self, key: &ChapterKey) -> LifebookResult<Option<GeneratedChapter>> {
        self.chapters.chapter(key).await
    }

    /// Compile and persist the book for a person.
    pub async fn compile_book(
        &self,
        person_id: &str,
        style_guide: Option<&str>,
    ) -> LifebookResult<CompiledBook> {
        self.books.compile(person_id, style_guide).await
    }

    /// The most recently compiled book for a person.
    pub async fn latest_book(&self, person_id: &str) -> LifebookResult<Option<CompiledBook>> {
        self.books.latest(person_id).await
    }

    /// The chapter generator.
    pub fn chapters(&self) -> &ChapterGenerator {
        &self.chapters
    }

    /// The book compiler.
    pub fn books(&self) -> &BookCompiler {
        &self.books
    }
}

impl std::fmt::Debug for NarrativePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativePipeline")
            .field("chapters", &self.chapters)
            .field("books", &self.books)
            .finish()
    }
}
