//! Prompt system for the course FAQ assistant.
//!
//! This crate turns a question and the FAQ entries retrieved for it into the
//! single prompt sent to the answer generator:
//! - Built-in teaching-assistant template
//! - Optional YAML prompt definitions overriding the template
//! - Handlebars rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::PromptBuilder;
pub use loader::load_prompt;
pub use types::PromptDefinition;
