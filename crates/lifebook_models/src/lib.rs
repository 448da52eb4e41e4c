//! Text-generation provider clients for Lifebook.
//!
//! Two providers are supported, both implementing
//! [`TextProvider`](lifebook_interface::TextProvider):
//!
//! - **OpenAI** chat completions ([`OpenAiClient`])
//! - **Anthropic** messages ([`AnthropicClient`])
//!
//! The provider is chosen once, from configuration, by [`create_provider`].
//!
//! # Example
//!
//! ```no_run
//! use lifebook_interface::TextProvider;
//! use lifebook_models::create_provider;
//! use lifebook_retry::ProviderConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = create_provider(&ProviderConfig::default())?;
//! let text = provider.complete("Say hello.").await?;
//! println!("{}: {}", provider.model_name(), text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod dto;
mod factory;
mod openai;

pub use anthropic::AnthropicClient;
pub use dto::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicRequestBuilder,
    AnthropicResponse, ChatChoice, ChatChoiceMessage, ChatMessage, OpenAiRequest,
    OpenAiRequestBuilder, OpenAiResponse,
};
pub use factory::{build_provider, create_provider};
pub use openai::OpenAiClient;
