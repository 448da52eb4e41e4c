//! OpenAI chat completions client.

use async_trait::async_trait;
use lifebook_error::{LifebookResult, ProviderError, ProviderErrorKind};
use lifebook_interface::TextProvider;
use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::{ChatMessage, OpenAiRequest, OpenAiResponse};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model identifier (e.g., "gpt-4o-mini")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
            endpoint: OPENAI_API_URL.to_string(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the generation token cap.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Point the client at a compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the request body for a single-turn prompt.
    pub fn build_request(&self, prompt: &str) -> LifebookResult<OpenAiRequest> {
        OpenAiRequest::builder()
            .model(self.model.clone())
            .messages(vec![ChatMessage::user(prompt)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())).into())
    }

    /// Sends a request to the OpenAI API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn send(&self, request: &OpenAiRequest) -> LifebookResult<OpenAiResponse> {
        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to OpenAI API");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenAI API returned error");
            return Err(ProviderError::new(ProviderErrorKind::ApiStatus {
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let parsed: OpenAiResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse OpenAI response");
            ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
        })?;

        debug!(response_id = %parsed.id(), "Received response from OpenAI");
        Ok(parsed)
    }
}

#[async_trait]
impl TextProvider for OpenAiClient {
    #[instrument(skip(self, prompt), fields(provider = "openai", model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> LifebookResult<String> {
        let request = self.build_request(prompt)?;
        let response = self.send(&request).await?;

        response
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse).into())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
