//! Chapter command handlers.

use std::path::{Path, PathBuf};

use lifebook::{
    ChapterKey, ChapterMeta, ChapterRequest, GeneratedChapter, JsonError, LifebookConfig,
    LifebookResult, StorageError, StorageErrorKind, load_facts, read_text_file,
};

use super::{OutputFormat, build_pipeline, open_store};

/// Arguments of the `chapter` command.
#[derive(Debug)]
pub struct ChapterArgs {
    pub person: String,
    pub chapter_id: String,
    pub title: String,
    pub order: i32,
    pub facts: PathBuf,
    pub style_guide: Option<PathBuf>,
    pub context: Option<String>,
    pub require_facts: bool,
}

/// Generate one chapter and print it.
pub async fn generate_chapter(
    config: &LifebookConfig,
    store: &Path,
    args: ChapterArgs,
    format: OutputFormat,
) -> LifebookResult<()> {
    let facts = load_facts(&args.facts)?;
    let style_guide = args
        .style_guide
        .as_deref()
        .map(|path| read_text_file(path))
        .transpose()?;

    let mut builder = ChapterRequest::builder();
    builder
        .person_id(args.person)
        .meta(ChapterMeta::new(args.chapter_id, args.title, args.order))
        .facts(facts)
        .require_facts(args.require_facts);
    if let Some(style_guide) = style_guide {
        builder.style_guide(style_guide);
    }
    if let Some(context) = args.context {
        builder.context_override(context);
    }
    let request = builder
        .build()
        .map_err(|e| lifebook::ConfigError::new(format!("Invalid chapter request: {}", e)))?;

    let pipeline = build_pipeline(config, store)?;
    let chapter = pipeline.generate_chapter(request).await?;
    print_chapter(&chapter, format)
}

/// Print a stored chapter.
///
/// A missing chapter is a `NotFound` storage error, so the process exits non-zero.
pub async fn show_chapter(
    store: &Path,
    person: &str,
    chapter_id: &str,
    format: OutputFormat,
) -> LifebookResult<()> {
    use lifebook::StoryRepository;

    let repository = open_store(store)?;
    let key = ChapterKey::new(person, chapter_id);
    match repository.get_chapter(&key).await? {
        Some(chapter) => print_chapter(&chapter, format),
        None => Err(StorageError::new(StorageErrorKind::NotFound(format!(
            "chapter {} in {}",
            key,
            store.display()
        )))
        .into()),
    }
}

fn print_chapter(chapter: &GeneratedChapter, format: OutputFormat) -> LifebookResult<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(chapter)
                .map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("## {}", chapter.title());
            println!();
            println!("{}", chapter.narrative());
            if let Some(summary) = chapter.summary().as_deref().filter(|s| !s.is_empty()) {
                println!("{:-<80}", "");
                println!("Summary: {}", summary);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifebook::{LifebookErrorKind, StoryRepository};

    #[tokio::test]
    async fn show_missing_chapter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = show_chapter(dir.path(), "p-1", "7", OutputFormat::Human)
            .await
            .unwrap_err();

        match err.kind() {
            LifebookErrorKind::Storage(storage) => {
                assert!(matches!(storage.kind, StorageErrorKind::NotFound(_)));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn show_stored_chapter_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let repository = open_store(dir.path()).unwrap();
        let chapter = GeneratedChapter::new(&ChapterMeta::new("7", "Later years", 7), "text");
        repository
            .put_chapter(&ChapterKey::new("p-1", "7"), chapter)
            .await
            .unwrap();

        show_chapter(dir.path(), "p-1", "7", OutputFormat::Json)
            .await
            .unwrap();
    }
}
