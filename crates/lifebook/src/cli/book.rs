//! Book command handlers.

use std::path::{Path, PathBuf};

use lifebook::{
    CompiledBook, JsonError, LifebookConfig, LifebookResult, StorageError, StorageErrorKind,
    read_text_file,
};

use super::{OutputFormat, build_pipeline, open_store};

/// Compile the book for `person` and print it.
pub async fn compile_book(
    config: &LifebookConfig,
    store: &Path,
    person: &str,
    style_guide: Option<PathBuf>,
    format: OutputFormat,
) -> LifebookResult<()> {
    let style_guide = style_guide
        .as_deref()
        .map(|path| read_text_file(path))
        .transpose()?;
    let pipeline = build_pipeline(config, store)?;
    let book = pipeline.compile_book(person, style_guide.as_deref()).await?;
    print_book(&book, format)
}

/// Print the most recently compiled book for `person`.
///
/// A missing book is a `NotFound` storage error, so the process exits non-zero.
pub async fn show_book(store: &Path, person: &str, format: OutputFormat) -> LifebookResult<()> {
    use lifebook::StoryRepository;

    let repository = open_store(store)?;
    match repository.get_book(person).await? {
        Some(book) => print_book(&book, format),
        None => Err(StorageError::new(StorageErrorKind::NotFound(format!(
            "book for {} in {}",
            person,
            store.display()
        )))
        .into()),
    }
}

fn print_book(book: &CompiledBook, format: OutputFormat) -> LifebookResult<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(book).map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("{}", book.book_text());
            println!("{:-<80}", "");
            println!(
                "Compiled from {} chapters at {}",
                book.chapters_used(),
                book.compiled_at().to_rfc3339()
            );
        }
    }
    Ok(())
}
