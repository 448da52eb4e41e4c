//! Configuration structures for the pipeline.
//!
//! This module provides TOML-based configuration for the provider, the retry
//! executor, chunking and prompt template overrides. The configuration
//! system supports:
//! - Bundled defaults (include_str! from lifebook.toml)
//! - User overrides (./lifebook.toml or ~/.config/lifebook/lifebook.toml)
//! - Environment overrides with the `LIFEBOOK_` prefix
//! - Automatic merging with later sources taking precedence

use config::{Config, Environment, File, FileFormat};
use lifebook_error::{ConfigError, LifebookError, LifebookResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Model used when nothing else is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Model substituted when Anthropic is selected but the OpenAI default leaked through.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

/// Which provider implementation to construct.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// OpenAI chat completions
    #[default]
    OpenAi,
    /// Anthropic messages
    Anthropic,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Provider selection and sampling parameters.
///
/// ```toml
/// [provider]
/// kind = "anthropic"
/// model = "claude-3-5-sonnet-latest"
/// temperature = 0.3
/// max_tokens = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider implementation to use
    pub kind: ProviderKind,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate per call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// API key; falls back to the provider's environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint override (proxies, compatible gateways)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: None,
            api_key: None,
            base_url: None,
        }
    }
}

impl ProviderConfig {
    /// Model name to send, remapping the OpenAI default for Anthropic.
    pub fn resolved_model(&self) -> &str {
        match self.kind {
            ProviderKind::Anthropic if self.model == DEFAULT_OPENAI_MODEL => {
                DEFAULT_ANTHROPIC_MODEL
            }
            _ => &self.model,
        }
    }

    /// Resolve the API key from config, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no key is available.
    pub fn resolve_api_key(&self) -> LifebookResult<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key using a custom environment lookup.
    pub fn resolve_api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> LifebookResult<String> {
        let key = self
            .api_key
            .clone()
            .or_else(|| lookup(self.kind.api_key_var()))
            .filter(|key| !key.trim().is_empty());

        key.ok_or_else(|| {
            LifebookError::from(ConfigError::new(format!(
                "{} is required when provider = {}",
                self.kind.api_key_var(),
                self.kind
            )))
        })
    }
}

/// Retry executor parameters.
///
/// Attempt `n` (0-based) that fails sleeps `base_delay_ms * 2^n`, capped at
/// `max_delay_secs`, before attempt `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts allowed per operation
    pub max_retries: usize,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Delay after the first failed attempt, in milliseconds
    pub base_delay_ms: u64,
    /// Upper bound on any single backoff delay, in seconds
    pub max_delay_secs: u64,
    /// Randomize delays to spread out concurrent retries
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_secs: 45,
            base_delay_ms: 1000,
            max_delay_secs: 60,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay after the first failed attempt.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Cap on a single backoff delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Chunking thresholds, in estimated tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target size of a single chunk
    pub chunk_target_tokens: usize,
    /// Fact sets at or below this size are never split
    pub skip_threshold: usize,
    /// Use the exact tokenizer when it is available
    pub exact_tokenizer: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_target_tokens: 1200,
            skip_threshold: 1500,
            exact_tokenizer: true,
        }
    }
}

/// Optional prompt template overrides, one file per chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Chapter narrative template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<PathBuf>,
    /// Chapter summary template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PathBuf>,
    /// Book compilation template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<PathBuf>,
}

/// Top-level Lifebook configuration.
///
/// # Example
///
/// ```no_run
/// use lifebook_retry::LifebookConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LifebookConfig::load()?;
/// println!("provider: {}", config.provider.kind);
/// println!("attempts: {}", config.retry.max_retries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LifebookConfig {
    /// Provider selection
    pub provider: ProviderConfig,
    /// Retry executor parameters
    pub retry: RetryConfig,
    /// Chunking thresholds
    pub chunking: ChunkingConfig,
    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl LifebookConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> LifebookResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                LifebookError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                LifebookError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has wrong value types.
    pub fn from_toml_str(toml: &str) -> LifebookResult<Self> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                LifebookError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> LifebookResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        const DEFAULT_CONFIG: &str = include_str!("../../../lifebook.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/lifebook/lifebook.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("lifebook").required(false))
            .add_source(
                Environment::with_prefix("LIFEBOOK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder
            .build()
            .map_err(|e| {
                LifebookError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                LifebookError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad value.
    pub fn validate(&self) -> LifebookResult<()> {
        if self.chunking.chunk_target_tokens == 0 {
            return Err(ConfigError::new("chunking.chunk_target_tokens must be positive").into());
        }
        if self.retry.timeout_secs == 0 {
            return Err(ConfigError::new("retry.timeout_secs must be positive").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bundled_file() {
        let bundled = LifebookConfig::from_toml_str(include_str!("../../../lifebook.toml"))
            .expect("bundled config parses");
        assert_eq!(bundled, LifebookConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = LifebookConfig::from_toml_str(
            r#"
            [provider]
            kind = "anthropic"

            [retry]
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Anthropic);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.timeout_secs, 45);
        assert_eq!(config.chunking.chunk_target_tokens, 1200);
    }

    #[test]
    fn anthropic_remaps_openai_default_model() {
        let provider = ProviderConfig {
            kind: ProviderKind::Anthropic,
            ..Default::default()
        };
        assert_eq!(provider.resolved_model(), DEFAULT_ANTHROPIC_MODEL);

        let openai = ProviderConfig::default();
        assert_eq!(openai.resolved_model(), DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn api_key_prefers_config_then_env() {
        let provider = ProviderConfig {
            api_key: Some("from-config".into()),
            ..Default::default()
        };
        let key = provider
            .resolve_api_key_with(|_| Some("from-env".into()))
            .unwrap();
        assert_eq!(key, "from-config");

        let provider = ProviderConfig::default();
        let key = provider
            .resolve_api_key_with(|name| (name == "OPENAI_API_KEY").then(|| "from-env".into()))
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let provider = ProviderConfig {
            kind: ProviderKind::Anthropic,
            ..Default::default()
        };
        let err = provider.resolve_api_key_with(|_| None).unwrap_err();
        assert!(format!("{}", err).contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn validate_rejects_zero_chunk_budget() {
        let mut config = LifebookConfig::default();
        config.chunking.chunk_target_tokens = 0;
        assert!(config.validate().is_err());
        assert!(LifebookConfig::default().validate().is_ok());
    }
}
