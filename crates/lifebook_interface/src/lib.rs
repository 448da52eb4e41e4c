//! Trait definitions for the Lifebook pipeline.
//!
//! The pipeline talks to the outside world through three ports:
//! - [`TextProvider`]: one prompt in, generated text out
//! - [`PromptChain`]: named template inputs in, generated text out
//! - [`StoryRepository`]: persistence for generated chapters and books

mod traits;
mod types;

pub use traits::{PromptChain, StoryRepository, TextProvider};
pub use types::PromptInputs;
