//! Provider selection from configuration.

use std::sync::Arc;

use lifebook_error::LifebookResult;
use lifebook_interface::TextProvider;
use lifebook_retry::{ProviderConfig, ProviderKind};
use tracing::{info, instrument};

use crate::{AnthropicClient, OpenAiClient};

/// Construct the configured provider.
///
/// The API key comes from `config.api_key` or, failing that, the
/// provider's environment variable (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`).
///
/// # Errors
///
/// Returns a configuration error if no API key is available. No network
/// call is made here.
#[instrument(skip(config), fields(kind = %config.kind))]
pub fn create_provider(config: &ProviderConfig) -> LifebookResult<Arc<dyn TextProvider>> {
    let api_key = config.resolve_api_key()?;
    Ok(build_provider(config, api_key))
}

/// Construct the configured provider with an explicit API key.
pub fn build_provider(config: &ProviderConfig, api_key: String) -> Arc<dyn TextProvider> {
    let model = config.resolved_model().to_string();
    info!(model = %model, "Selected text provider");

    match config.kind {
        ProviderKind::OpenAi => {
            let mut client = OpenAiClient::new(api_key, model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens);
            if let Some(url) = &config.base_url {
                client = client.with_endpoint(url.clone());
            }
            Arc::new(client)
        }
        ProviderKind::Anthropic => {
            let mut client = AnthropicClient::new(api_key, model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens);
            if let Some(url) = &config.base_url {
                client = client.with_endpoint(url.clone());
            }
            Arc::new(client)
        }
    }
}
