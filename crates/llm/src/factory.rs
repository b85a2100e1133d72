//! Answer generator factory.
//!
//! Builds the completion client and the [`AnswerGenerator`] from
//! application configuration. A missing API key is not an error here; the
//! client is created without a credential and the bootstrap sequence
//! reports it.

use crate::client::LlmClient;
use crate::generator::AnswerGenerator;
use crate::providers::OpenAiClient;
use faq_core::AppConfig;
use std::sync::Arc;

/// Create the completion client for the configured endpoint.
pub fn create_client(endpoint: &str, api_key: Option<&str>) -> Arc<dyn LlmClient> {
    Arc::new(OpenAiClient::with_base_url(
        endpoint,
        api_key.map(str::to_string),
    ))
}

/// Create the answer generator described by `config`.
pub fn create_generator(config: &AppConfig) -> AnswerGenerator {
    let client = create_client(&config.llm_endpoint, config.api_key.as_deref());
    AnswerGenerator::new(client, &config.model)
}
