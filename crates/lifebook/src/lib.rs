//! Lifebook - life stories from short first-person answers
//!
//! Lifebook turns a person's answers to biographical questions ("facts")
//! into long-form chapter narratives with a text-generation provider, then
//! compiles the chapters into one continuous book.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lifebook::{
//!     ChapterMeta, ChapterRequest, Fact, InMemoryStoryRepository, LifebookConfig,
//!     NarrativePipeline, create_provider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LifebookConfig::load()?;
//!     let provider = create_provider(&config.provider)?;
//!     let pipeline = NarrativePipeline::from_config(
//!         &config,
//!         provider,
//!         Arc::new(InMemoryStoryRepository::new()),
//!     )?;
//!
//!     let request = ChapterRequest::builder()
//!         .person_id("p-1")
//!         .meta(ChapterMeta::new("1", "Roots", 1))
//!         .facts(vec![Fact::now("1-01", "I was born in Haifa")])
//!         .build()?;
//!     let chapter = pipeline.generate_chapter(request).await?;
//!     println!("{}", chapter.narrative());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `lifebook_error` - Error types
//! - `lifebook_core` - Facts, chapters, books and the token estimator
//! - `lifebook_interface` - Provider, prompt chain and repository traits
//! - `lifebook_retry` - Retry executor and configuration
//! - `lifebook_storage` - In-memory and filesystem repositories
//! - `lifebook_models` - OpenAI and Anthropic clients
//! - `lifebook_narrative` - Chunking, context chaining, chapter and book generation
//!
//! This crate re-exports everything for convenience.

mod facts;
mod telemetry;

pub use facts::{default_store_dir, load_facts, read_text_file};
pub use telemetry::init_console_telemetry;

pub use lifebook_core::*;
pub use lifebook_error::*;
pub use lifebook_interface::*;
pub use lifebook_models::*;
pub use lifebook_narrative::*;
pub use lifebook_retry::*;
pub use lifebook_storage::*;
