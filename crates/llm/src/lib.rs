//! LLM integration crate for the course FAQ assistant.
//!
//! This crate provides a provider-agnostic abstraction over text-completion
//! services and the [`AnswerGenerator`] that the question pipeline calls.
//!
//! # Providers
//! - **OpenAI**: chat-completions API (or any compatible server)
//!
//! # Example
//! ```no_run
//! use faq_llm::{AnswerGenerator, providers::OpenAiClient};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let client = Arc::new(OpenAiClient::new(std::env::var("OPENAI_API_KEY").ok()));
//! let generator = AnswerGenerator::new(client, "gpt-4o-mini");
//! println!("{}", generator.generate("Hello, world!").await);
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generator;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, create_generator};
pub use generator::AnswerGenerator;
pub use providers::OpenAiClient;
