//! In-memory story repository.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use lifebook_core::{ChapterKey, CompiledBook, GeneratedChapter};
use lifebook_error::{LifebookResult, StorageError, StorageErrorKind};
use lifebook_interface::StoryRepository;

/// Story repository backed by process-local maps.
///
/// Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStoryRepository {
    chapters: RwLock<HashMap<ChapterKey, GeneratedChapter>>,
    books: RwLock<HashMap<String, CompiledBook>>,
}

impl InMemoryStoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chapters across all people.
    pub fn chapter_count(&self) -> usize {
        self.chapters.read().map(|map| map.len()).unwrap_or(0)
    }
}

fn poisoned(what: &str) -> StorageError {
    StorageError::new(StorageErrorKind::Unavailable(format!(
        "{} lock poisoned",
        what
    )))
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn get_chapter(&self, key: &ChapterKey) -> LifebookResult<Option<GeneratedChapter>> {
        let chapters = self.chapters.read().map_err(|_| poisoned("chapter"))?;
        Ok(chapters.get(key).cloned())
    }

    async fn put_chapter(
        &self,
        key: &ChapterKey,
        chapter: GeneratedChapter,
    ) -> LifebookResult<()> {
        let mut chapters = self.chapters.write().map_err(|_| poisoned("chapter"))?;
        chapters.insert(key.clone(), chapter);
        tracing::debug!(key = %key, "Stored chapter in memory");
        Ok(())
    }

    async fn chapters_for(&self, person_id: &str) -> LifebookResult<Vec<GeneratedChapter>> {
        let chapters = self.chapters.read().map_err(|_| poisoned("chapter"))?;
        Ok(chapters
            .iter()
            .filter(|(key, _)| key.person_id == person_id)
            .map(|(_, chapter)| chapter.clone())
            .collect())
    }

    async fn get_book(&self, person_id: &str) -> LifebookResult<Option<CompiledBook>> {
        let books = self.books.read().map_err(|_| poisoned("book"))?;
        Ok(books.get(person_id).cloned())
    }

    async fn put_book(&self, person_id: &str, book: CompiledBook) -> LifebookResult<()> {
        let mut books = self.books.write().map_err(|_| poisoned("book"))?;
        books.insert(person_id.to_string(), book);
        tracing::debug!(person_id, "Stored book in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifebook_core::ChapterMeta;

    #[tokio::test]
    async fn chapters_are_scoped_by_person() {
        let repo = InMemoryStoryRepository::new();
        let meta = ChapterMeta::new("1", "Roots", 1);

        repo.put_chapter(&ChapterKey::new("a", "1"), GeneratedChapter::new(&meta, "A"))
            .await
            .unwrap();
        repo.put_chapter(&ChapterKey::new("b", "1"), GeneratedChapter::new(&meta, "B"))
            .await
            .unwrap();

        let chapters = repo.chapters_for("a").await.unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].narrative(), "A");
        assert_eq!(repo.chapter_count(), 2);
    }

    #[tokio::test]
    async fn put_chapter_overwrites() {
        let repo = InMemoryStoryRepository::new();
        let meta = ChapterMeta::new("1", "Roots", 1);
        let key = ChapterKey::new("a", "1");

        repo.put_chapter(&key, GeneratedChapter::new(&meta, "first"))
            .await
            .unwrap();
        repo.put_chapter(&key, GeneratedChapter::new(&meta, "second"))
            .await
            .unwrap();

        let stored = repo.get_chapter(&key).await.unwrap().unwrap();
        assert_eq!(stored.narrative(), "second");
        assert_eq!(repo.chapter_count(), 1);
    }
}
