//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the lifebook binary.

mod book;
mod chapter;
mod commands;

pub use book::{compile_book, show_book};
pub use chapter::{ChapterArgs, generate_chapter, show_chapter};
pub use commands::{Cli, Commands, OutputFormat};

use std::path::Path;
use std::sync::Arc;

use lifebook::{
    FileSystemStoryRepository, LifebookConfig, LifebookResult, NarrativePipeline, create_provider,
};

/// Load configuration from `path` or the standard locations.
pub fn load_config(path: Option<&Path>) -> LifebookResult<LifebookConfig> {
    match path {
        Some(path) => LifebookConfig::from_file(path),
        None => LifebookConfig::load(),
    }
}

/// Open the filesystem repository at `store`.
pub fn open_store(store: &Path) -> LifebookResult<Arc<FileSystemStoryRepository>> {
    Ok(Arc::new(FileSystemStoryRepository::new(store)?))
}

/// Build a pipeline over the configured provider and the store.
pub fn build_pipeline(
    config: &LifebookConfig,
    store: &Path,
) -> LifebookResult<NarrativePipeline> {
    let provider = create_provider(&config.provider)?;
    NarrativePipeline::from_config(config, provider, open_store(store)?)
}
