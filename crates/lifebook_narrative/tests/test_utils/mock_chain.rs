//! Scripted prompt chain for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lifebook_error::{LifebookResult, ProviderError, ProviderErrorKind};
use lifebook_interface::{PromptChain, PromptInputs};

type Script = dyn Fn(&PromptInputs, usize) -> LifebookResult<String> + Send + Sync;

/// A prompt chain whose replies come from a closure.
///
/// Every invocation is recorded so tests can assert on what the pipeline
/// actually sent.
pub struct MockChain {
    name: String,
    script: Box<Script>,
    calls: Arc<Mutex<Vec<PromptInputs>>>,
}

impl MockChain {
    /// Chain driven by `script(inputs, call_index)`.
    pub fn new(
        name: impl Into<String>,
        script: impl Fn(&PromptInputs, usize) -> LifebookResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            script: Box::new(script),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always reply with `text`.
    pub fn success(name: &str, text: &str) -> Self {
        let text = text.to_string();
        Self::new(name, move |_, _| Ok(text.clone()))
    }

    /// Reply with `"{prefix}[{input}]"` for the named input.
    pub fn echo(name: &str, input: &str, prefix: &str) -> Self {
        let input = input.to_string();
        let prefix = prefix.to_string();
        Self::new(name, move |inputs, _| {
            Ok(format!("{}[{}]", prefix, inputs.get(&input).unwrap_or("<missing>")))
        })
    }

    /// Always fail.
    pub fn failing(name: &str) -> Self {
        Self::new(name, |_, _| Err(provider_failure()))
    }

    /// Fail the first `failures` calls, then reply with `text`.
    pub fn fail_then(name: &str, failures: usize, text: &str) -> Self {
        let text = text.to_string();
        Self::new(name, move |_, call| {
            if call < failures {
                Err(provider_failure())
            } else {
                Ok(text.clone())
            }
        })
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Inputs of every invocation, in order.
    pub fn calls(&self) -> Vec<PromptInputs> {
        self.calls.lock().unwrap().clone()
    }

    /// Value of `input` on call `index`.
    pub fn input(&self, index: usize, input: &str) -> Option<String> {
        self.calls.lock().unwrap()[index].get(input).map(str::to_string)
    }
}

/// The error scripted chains fail with.
pub fn provider_failure() -> lifebook_error::LifebookError {
    ProviderError::new(ProviderErrorKind::ApiStatus {
        status: 500,
        message: "scripted failure".to_string(),
    })
    .into()
}

#[async_trait]
impl PromptChain for MockChain {
    async fn invoke(&self, inputs: &PromptInputs) -> LifebookResult<String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(inputs.clone());
            calls.len() - 1
        };
        (self.script)(inputs, index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
