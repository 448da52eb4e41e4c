//! Filesystem-based story repository.
//!
//! Records are stored as pretty-printed JSON documents, one per chapter and
//! one per book, grouped by person.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lifebook_core::{ChapterKey, CompiledBook, GeneratedChapter};
use lifebook_error::{LifebookResult, StorageError, StorageErrorKind};
use lifebook_interface::StoryRepository;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Filesystem story repository.
///
/// # Layout
///
/// ```text
/// {base_path}/
/// └── {person_id}/
///     ├── book.json
///     └── chapters/
///         ├── 1.json
///         └── 2.json
/// ```
///
/// Identifiers are encoded one-to-one into path components that stay inside
/// the base directory. Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemStoryRepository {
    base_path: PathBuf,
}

impl FileSystemStoryRepository {
    /// Create a repository rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> LifebookResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened filesystem story repository");
        Ok(Self { base_path })
    }

    /// Root directory of the repository.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn person_dir(&self, person_id: &str) -> PathBuf {
        self.base_path.join(encode_segment(person_id))
    }

    fn chapters_dir(&self, person_id: &str) -> PathBuf {
        self.person_dir(person_id).join("chapters")
    }

    fn chapter_path(&self, key: &ChapterKey) -> PathBuf {
        self.chapters_dir(&key.person_id)
            .join(format!("{}.json", encode_segment(&key.chapter_id)))
    }

    fn book_path(&self, person_id: &str) -> PathBuf {
        self.person_dir(person_id).join("book.json")
    }
}

/// Map an identifier to a single path component, one-to-one.
///
/// Lowercase ASCII letters, digits and `-` pass through. Every other byte of
/// the UTF-8 encoding becomes `_xx` (lowercase hex), so `_` only ever starts
/// an escape and distinct ids never share a name, even on case-insensitive
/// filesystems. The empty id maps to a lone `_`.
fn encode_segment(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }

    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{:02x}", byte));
        }
    }
    encoded
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> LifebookResult<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into());
        }
    };

    let value = serde_json::from_slice(&bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::Serialization(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(Some(value))
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> LifebookResult<()> {
    let data = serde_json::to_vec_pretty(value).map_err(|e| {
        StorageError::new(StorageErrorKind::Serialization(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    // Write to temp file first, then rename for atomicity
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;

    tracing::debug!(path = %path.display(), size = data.len(), "Wrote record");
    Ok(())
}

#[async_trait]
impl StoryRepository for FileSystemStoryRepository {
    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn get_chapter(&self, key: &ChapterKey) -> LifebookResult<Option<GeneratedChapter>> {
        read_json(&self.chapter_path(key)).await
    }

    #[tracing::instrument(skip(self, chapter), fields(key = %key))]
    async fn put_chapter(
        &self,
        key: &ChapterKey,
        chapter: GeneratedChapter,
    ) -> LifebookResult<()> {
        write_json(&self.chapter_path(key), &chapter).await?;
        tracing::info!(order = chapter.order(), "Stored chapter");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn chapters_for(&self, person_id: &str) -> LifebookResult<Vec<GeneratedChapter>> {
        let dir = self.chapters_dir(person_id);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
                .into());
            }
        };

        let mut chapters = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(chapter) = read_json::<GeneratedChapter>(&path).await? {
                chapters.push(chapter);
            }
        }

        tracing::debug!(count = chapters.len(), "Loaded chapters");
        Ok(chapters)
    }

    #[tracing::instrument(skip(self))]
    async fn get_book(&self, person_id: &str) -> LifebookResult<Option<CompiledBook>> {
        read_json(&self.book_path(person_id)).await
    }

    #[tracing::instrument(skip(self, book), fields(chapters_used = book.chapters_used()))]
    async fn put_book(&self, person_id: &str, book: CompiledBook) -> LifebookResult<()> {
        write_json(&self.book_path(person_id), &book).await?;
        tracing::info!("Stored compiled book");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_segment_blocks_traversal() {
        assert_eq!(encode_segment("../etc"), "_2e_2e_2fetc");
        assert_eq!(encode_segment("person-1"), "person-1");
        assert_eq!(encode_segment(""), "_");
    }

    #[test]
    fn encode_segment_is_one_to_one() {
        assert_ne!(encode_segment("john.doe"), encode_segment("john_doe"));
        assert_ne!(encode_segment("Anna"), encode_segment("anna"));
        assert_ne!(encode_segment("_"), encode_segment(""));
        assert_eq!(encode_segment("john_doe"), "john_5fdoe");
        // Hebrew letters are two UTF-8 bytes each.
        assert_eq!(encode_segment("דוד"), "_d7_93_d7_95_d7_93");
    }
}
