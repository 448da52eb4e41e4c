//! Anthropic messages client.

use async_trait::async_trait;
use lifebook_error::{LifebookResult, ProviderError, ProviderErrorKind};
use lifebook_interface::TextProvider;
use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::{AnthropicMessage, AnthropicRequest, AnthropicResponse};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: u32,
    endpoint: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-latest")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            endpoint: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the generation token cap. `None` keeps the default of 4096.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        if let Some(max_tokens) = max_tokens {
            self.max_tokens = max_tokens;
        }
        self
    }

    /// Point the client at a compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the request body for a single-turn prompt.
    pub fn build_request(&self, prompt: &str) -> LifebookResult<AnthropicRequest> {
        AnthropicRequest::builder()
            .model(self.model.clone())
            .max_tokens(self.max_tokens)
            .messages(vec![AnthropicMessage::user_text(prompt)])
            .temperature(self.temperature)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())).into())
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn send(&self, request: &AnthropicRequest) -> LifebookResult<AnthropicResponse> {
        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Anthropic API returned error");
            return Err(ProviderError::new(ProviderErrorKind::ApiStatus {
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let parsed: AnthropicResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
        })?;

        debug!(response_id = %parsed.id(), "Received response from Anthropic");
        Ok(parsed)
    }
}

#[async_trait]
impl TextProvider for AnthropicClient {
    #[instrument(skip(self, prompt), fields(provider = "anthropic", model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> LifebookResult<String> {
        let request = self.build_request(prompt)?;
        let response = self.send(&request).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyResponse).into());
        }
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
