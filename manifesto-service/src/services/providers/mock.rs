//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

enum MockBehavior {
    Reply(String),
    Fail(fn() -> ProviderError),
}

/// Mock text provider for testing.
///
/// Every prompt it receives is recorded so tests can assert on call count
/// and prompt contents.
pub struct MockTextProvider {
    behavior: MockBehavior,
    latency: Duration,
    ready: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Provider that answers every prompt with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Reply(reply.into()),
            latency: Duration::ZERO,
            ready: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Provider that fails every call with the error built by `error`.
    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
            latency: Duration::ZERO,
            ready: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Report the provider as not configured from `health_check`.
    pub fn unready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: text.len() as i32 / 4,
                finish_reason: FinishReason::Complete,
            }),
            MockBehavior::Fail(error) => Err(error()),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.ready {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured("mock provider marked unready".to_string()))
        }
    }
}
