//! Answer generation on top of an [`LlmClient`].
//!
//! Generation never fails from the caller's point of view: provider errors
//! are folded into a user-facing message so a flaky completion service
//! cannot take the question pipeline down.

use crate::client::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Turns a built prompt into natural-language text with a fixed model.
#[derive(Clone)]
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether the underlying provider has its credential.
    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    /// Generate an answer for `prompt`.
    ///
    /// On failure the returned text embeds the error detail instead of
    /// propagating it.
    pub async fn generate(&self, prompt: &str) -> String {
        let request = LlmRequest::new(prompt, &self.model);

        match self.client.complete(&request).await {
            Ok(response) => {
                tracing::debug!(
                    "Token usage - Prompt: {}, Completion: {}, Total: {}",
                    response.usage.prompt_tokens,
                    response.usage.completion_tokens,
                    response.usage.total_tokens
                );
                response.content
            }
            Err(e) => {
                tracing::error!(
                    provider = self.client.provider_name(),
                    "Answer generation failed: {}",
                    e
                );
                format!("Sorry, I encountered an error: {}", e)
            }
        }
    }
}
