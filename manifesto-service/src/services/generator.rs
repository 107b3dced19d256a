//! Manifesto drafting: prompt construction and the bounded model call.

use crate::error::ManifestoError;
use crate::services::metrics;
use crate::services::providers::{GenerationParams, TextProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sections every generated manifesto must contain, in order.
pub const MANIFESTO_SECTIONS: [&str; 5] = [
    "Introduction",
    "Vision Statement",
    "Key Issues & Proposed Solutions",
    "Policy Priorities",
    "Conclusion",
];

/// Render the drafting prompt. Values are interpolated verbatim.
pub fn build_prompt(party_name: &str, issues: &str, policies: &str, vision: &str) -> String {
    let sections: String = MANIFESTO_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {}\n", i + 1, section))
        .collect();

    format!(
        "Draft an election manifesto for the political organization \"{party_name}\".\n\
         \n\
         Key Issues: {issues}\n\
         Policy Priorities: {policies}\n\
         Vision: {vision}\n\
         \n\
         The manifesto should be well-structured with these sections:\n\
         {sections}\
         \n\
         Use a professional, formal, and inspirational tone.\n"
    )
}

/// Builds prompts and sends them to the injected text provider.
#[derive(Clone)]
pub struct ManifestoGenerator {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
    timeout: Duration,
}

impl ManifestoGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams, timeout: Duration) -> Self {
        Self {
            provider,
            params,
            timeout,
        }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Draft a manifesto and return the model's text unmodified.
    ///
    /// Exactly one provider call is made. Provider failures surface as
    /// [`ManifestoError::Generation`]; exceeding the configured timeout
    /// surfaces as [`ManifestoError::Timeout`].
    pub async fn generate(
        &self,
        party_name: &str,
        issues: &str,
        policies: &str,
        vision: &str,
    ) -> Result<String, ManifestoError> {
        let prompt = build_prompt(party_name, issues, policies, vision);
        let provider_name = self.provider.name();
        let model = self.provider.model();

        let start = Instant::now();
        let outcome =
            tokio::time::timeout(self.timeout, self.provider.generate(&prompt, &self.params)).await;
        let elapsed = start.elapsed().as_secs_f64();
        metrics::record_provider_latency(provider_name, model, elapsed);

        match outcome {
            Ok(Ok(response)) => {
                metrics::record_tokens(model, response.input_tokens, response.output_tokens);
                metrics::record_generation(model, "success", response.finish_reason.as_str());
                tracing::info!(
                    provider = provider_name,
                    model,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    latency_secs = elapsed,
                    "Manifesto generated"
                );
                Ok(response.text)
            }
            Ok(Err(e)) => {
                metrics::record_provider_error(provider_name, e.kind());
                metrics::record_generation(model, "error", "error");
                tracing::error!(provider = provider_name, model, error = %e, "Manifesto generation failed");
                Err(ManifestoError::Generation(e))
            }
            Err(_) => {
                metrics::record_provider_error(provider_name, "timeout");
                metrics::record_generation(model, "timeout", "error");
                tracing::error!(
                    provider = provider_name,
                    model,
                    timeout_secs = self.timeout.as_secs(),
                    "Manifesto generation timed out"
                );
                Err(ManifestoError::Timeout(self.timeout))
            }
        }
    }
}
