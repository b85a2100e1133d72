//! Command handlers for the course FAQ CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod courses;
pub mod health;
pub mod status;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use courses::CoursesCommand;
pub use health::HealthCommand;
pub use status::StatusCommand;

use faq_knowledge::{InitializationStatus, RagOrchestrator};
use std::time::Duration;

/// How often the CLI re-reads the initialization status.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Poll the assistant until initialization reaches READY or FAILED.
///
/// Progress changes are echoed to stderr unless `quiet` is set.
pub async fn await_initialization(
    orchestrator: &RagOrchestrator,
    quiet: bool,
) -> InitializationStatus {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut last_progress = String::new();

    loop {
        ticker.tick().await;
        let status = orchestrator.initialization_status();

        if !quiet && status.progress != last_progress {
            eprintln!("[{}] {}", status.state, status.progress);
            last_progress = status.progress.clone();
        }

        if status.state.is_terminal() {
            return status;
        }
    }
}
