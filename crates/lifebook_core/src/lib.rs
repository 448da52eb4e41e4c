//! Core data types for the Lifebook narrative generation pipeline.
//!
//! This crate provides the records that flow between the pipeline and its
//! persistence port (facts in, chapters and books out) plus the token
//! estimator used for chunking decisions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod chapter;
mod chunk;
mod fact;
mod tokens;

pub use book::CompiledBook;
pub use chapter::{ChapterKey, ChapterMeta, ChapterState, GeneratedChapter};
pub use chunk::Chunk;
pub use fact::{Fact, render_bullets};
pub use tokens::TokenEstimator;
