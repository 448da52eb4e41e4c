//! Narrative generation for Lifebook.
//!
//! Turns short first-person facts into chapter narratives and compiles the
//! chapters into a book:
//!
//! 1. [`ContextChainer`] builds "the story so far" from earlier chapter summaries
//! 2. [`Chunker`] splits the chapter's facts into token-bounded chunks
//! 3. [`ChunkReducer`] runs the chapter chain over each chunk and joins the results
//! 4. [`SummaryGenerator`] condenses the narrative for later chapters
//! 5. [`ChapterGenerator`] persists the chapter with its summary
//! 6. [`BookCompiler`] assembles all chapters, in book order, into one text
//!
//! Every provider call goes through a
//! [`RetryExecutor`](lifebook_retry::RetryExecutor). [`NarrativePipeline`]
//! wires the pieces together from a
//! [`LifebookConfig`](lifebook_retry::LifebookConfig).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod chain;
mod chapter;
mod chunker;
mod context;
mod locks;
mod pipeline;
mod reducer;
mod summary;
mod template;

pub use book::{BookCompiler, TIMELINE_PLACEHOLDER, render_chapters};
pub use chain::TemplateChain;
pub use chapter::{ChapterGenerator, ChapterRequest, ChapterRequestBuilder, NO_STYLE_GUIDE};
pub use chunker::Chunker;
pub use context::{ContextChainer, NO_PRIOR_SUMMARIES};
pub use locks::KeyedLocks;
pub use pipeline::{NarrativePipeline, PipelineChains};
pub use reducer::{ChunkReducer, FACTS_INPUT, ReduceReport};
pub use summary::SummaryGenerator;
pub use template::{CHAPTER_TEMPLATE, COMPILE_TEMPLATE, PromptTemplate, SUMMARY_TEMPLATE};
