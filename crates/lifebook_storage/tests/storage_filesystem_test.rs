//! Tests for the filesystem story repository.

use lifebook_core::{ChapterKey, ChapterMeta, CompiledBook, GeneratedChapter};
use lifebook_interface::StoryRepository;
use lifebook_storage::FileSystemStoryRepository;
use tempfile::TempDir;

fn chapter(id: &str, order: i32, narrative: &str) -> GeneratedChapter {
    GeneratedChapter::new(&ChapterMeta::new(id, format!("Chapter {}", id), order), narrative)
        .with_summary(format!("summary of {}", id))
}

#[tokio::test]
async fn test_store_and_retrieve_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();
    let key = ChapterKey::new("person-1", "2");

    repo.put_chapter(&key, chapter("2", 2, "We moved north."))
        .await
        .unwrap();

    let stored = repo.get_chapter(&key).await.unwrap().unwrap();
    assert_eq!(stored.narrative(), "We moved north.");
    assert_eq!(stored.summary().as_deref(), Some("summary of 2"));
    assert_eq!(*stored.order(), 2);

    let path = temp_dir
        .path()
        .join("person-1")
        .join("chapters")
        .join("2.json");
    assert!(path.exists());
}

#[tokio::test]
async fn test_missing_records_are_none() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();

    assert!(
        repo.get_chapter(&ChapterKey::new("nobody", "1"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(repo.get_book("nobody").await.unwrap().is_none());
    assert!(repo.chapters_for("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_overwrite_leaves_single_record() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();
    let key = ChapterKey::new("p", "1");

    repo.put_chapter(&key, chapter("1", 1, "draft")).await.unwrap();
    repo.put_chapter(&key, chapter("1", 1, "final")).await.unwrap();

    let chapters = repo.chapters_for("p").await.unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].narrative(), "final");

    // No temp files left behind
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path().join("p").join("chapters"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_chapters_for_lists_only_that_person() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();

    for (id, order) in [("1", 1), ("2", 2), ("3", 3)] {
        repo.put_chapter(&ChapterKey::new("alice", id), chapter(id, order, "a"))
            .await
            .unwrap();
    }
    repo.put_chapter(&ChapterKey::new("bob", "1"), chapter("1", 1, "b"))
        .await
        .unwrap();

    let mut orders: Vec<i32> = repo
        .chapters_for("alice")
        .await
        .unwrap()
        .iter()
        .map(|c| *c.order())
        .collect();
    orders.sort();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_book_round_trip_and_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();

    repo.put_book("p", CompiledBook::new("v1", 2, None))
        .await
        .unwrap();
    repo.put_book("p", CompiledBook::new("v2", 3, Some("warm".into())))
        .await
        .unwrap();

    let book = repo.get_book("p").await.unwrap().unwrap();
    assert_eq!(book.book_text(), "v2");
    assert_eq!(*book.chapters_used(), 3);
    assert_eq!(book.style_guide().as_deref(), Some("warm"));
}

#[tokio::test]
async fn test_corrupt_record_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();

    let dir = temp_dir.path().join("p");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("book.json"), b"{ not json").unwrap();

    let err = repo.get_book("p").await.unwrap_err();
    assert!(format!("{}", err).contains("serialize"));
}

#[tokio::test]
async fn test_identifiers_cannot_escape_base() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("store");
    let repo = FileSystemStoryRepository::new(&base).unwrap();

    repo.put_book("../outside", CompiledBook::new("x", 1, None))
        .await
        .unwrap();

    assert!(!temp_dir.path().join("outside").exists());
    assert!(repo.get_book("../outside").await.unwrap().is_some());
}

#[tokio::test]
async fn test_similar_identifiers_keep_separate_records() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemStoryRepository::new(temp_dir.path()).unwrap();

    let pairs = [
        (ChapterKey::new("john.doe", "1"), "JOHN DOT"),
        (ChapterKey::new("john_doe", "1"), "JOHN UNDERSCORE"),
        (ChapterKey::new("דוד", "1"), "DAVID"),
        (ChapterKey::new("שרה", "1"), "SARAH"),
        (ChapterKey::new("p", "1.a"), "DOTTED CHAPTER"),
        (ChapterKey::new("p", "1_a"), "UNDERSCORED CHAPTER"),
    ];
    for (key, narrative) in &pairs {
        repo.put_chapter(key, chapter(&key.chapter_id, 1, narrative))
            .await
            .unwrap();
    }

    for (key, narrative) in &pairs {
        let stored = repo.get_chapter(key).await.unwrap().unwrap();
        assert_eq!(stored.narrative(), *narrative, "key {}", key);
    }

    let david = repo.chapters_for("דוד").await.unwrap();
    assert_eq!(david.len(), 1);
    assert_eq!(david[0].narrative(), "DAVID");
    assert_eq!(repo.chapters_for("p").await.unwrap().len(), 2);
}
