//! Persistence adapters for generated chapters and compiled books.
//!
//! Both adapters implement [`StoryRepository`](lifebook_interface::StoryRepository):
//!
//! - [`InMemoryStoryRepository`]: process-local maps, for tests and one-shot runs
//! - [`FileSystemStoryRepository`]: one JSON document per record under a base directory
//!
//! # Example
//!
//! ```rust
//! use lifebook_core::{ChapterKey, ChapterMeta, GeneratedChapter};
//! use lifebook_interface::StoryRepository;
//! use lifebook_storage::InMemoryStoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = InMemoryStoryRepository::new();
//! let key = ChapterKey::new("p-1", "1");
//! let chapter = GeneratedChapter::new(&ChapterMeta::new("1", "Roots", 1), "Once...");
//!
//! repo.put_chapter(&key, chapter).await?;
//! assert!(repo.get_chapter(&key).await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;

pub use filesystem::FileSystemStoryRepository;
pub use lifebook_error::{StorageError, StorageErrorKind};
pub use memory::InMemoryStoryRepository;
