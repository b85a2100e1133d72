//! Course FAQ retrieval and answering.
//!
//! Provides the search index client and its backends, the corpus loader,
//! the background [`InitializationSupervisor`] that prepares the index, and
//! the [`RagOrchestrator`] that answers questions over it.
//!
//! # Example
//! ```no_run
//! use faq_core::AppConfig;
//! use faq_knowledge::create_orchestrator;
//!
//! # async fn example() -> faq_core::AppResult<()> {
//! let config = AppConfig::load()?;
//! let assistant = create_orchestrator(&config)?;
//! assistant.supervisor().wait_until_settled().await;
//! println!("{}", assistant.ask("How do I run Kafka?", None).await);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod corpus;
pub mod elasticsearch;
pub mod factory;
pub mod memory;
pub mod rag;
pub mod search;
pub mod supervisor;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use backend::SearchBackend;
pub use corpus::{CorpusSource, FileCorpus, HttpCorpus};
pub use elasticsearch::ElasticsearchBackend;
pub use factory::{create_components, create_orchestrator};
pub use memory::MemoryBackend;
pub use rag::{RagComponents, RagOrchestrator, NO_INFORMATION_ANSWER};
pub use search::SearchIndexClient;
pub use supervisor::{BootstrapSettings, InitializationSupervisor};
pub use types::{
    HealthReport, InitializationState, InitializationStatus, SchemaOutcome, SearchQuery,
};
