//! Template + provider prompt chain.

use std::sync::Arc;

use async_trait::async_trait;
use lifebook_error::LifebookResult;
use lifebook_interface::{PromptChain, PromptInputs, TextProvider};
use tracing::{debug, instrument};

use crate::PromptTemplate;

/// Renders a [`PromptTemplate`], sends it to a [`TextProvider`] and trims
/// the reply.
///
/// Every call renders and sends afresh, so the retry executor can invoke
/// the same chain once per attempt.
#[derive(Clone)]
pub struct TemplateChain {
    template: PromptTemplate,
    provider: Arc<dyn TextProvider>,
}

impl TemplateChain {
    /// Create a chain.
    pub fn new(template: PromptTemplate, provider: Arc<dyn TextProvider>) -> Self {
        Self { template, provider }
    }

    /// The template this chain renders.
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

impl std::fmt::Debug for TemplateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateChain")
            .field("template", &self.template.name())
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_name())
            .finish()
    }
}

#[async_trait]
impl PromptChain for TemplateChain {
    #[instrument(skip(self, inputs), fields(chain = %self.template.name(), model = %self.provider.model_name()))]
    async fn invoke(&self, inputs: &PromptInputs) -> LifebookResult<String> {
        let prompt = self.template.render(inputs)?;
        debug!(prompt_len = prompt.len(), "Rendered prompt");

        let output = self.provider.complete(&prompt).await?;
        Ok(output.trim().to_string())
    }

    fn name(&self) -> &str {
        self.template.name()
    }
}
