//! Retry execution and pipeline configuration.
//!
//! Provider calls are slow and flaky. Every call the pipeline makes goes
//! through a [`RetryExecutor`], which bounds each attempt with a timeout and
//! backs off exponentially between attempts. The executor reports an
//! explicit [`RetryOutcome`] so callers branch on data rather than on
//! whichever error happened to escape.
//!
//! Configuration lives here as well, loaded from TOML with the same
//! precedence rules used across the workspace:
//! - Bundled defaults (include_str! from lifebook.toml)
//! - User overrides (~/.config/lifebook/lifebook.toml, then ./lifebook.toml)
//! - Environment (`LIFEBOOK_RETRY__MAX_RETRIES=5`)

mod config;
mod executor;

pub use config::{
    ChunkingConfig, LifebookConfig, PromptsConfig, ProviderConfig, ProviderKind, RetryConfig,
    DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENAI_MODEL,
};
pub use executor::{RetryExecutor, RetryOutcome};
