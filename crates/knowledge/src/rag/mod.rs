//! Question answering over the FAQ index.
//!
//! Retrieves matching documents, builds a prompt and generates an answer.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{RagComponents, RagOrchestrator};
pub use types::NO_INFORMATION_ANSWER;
