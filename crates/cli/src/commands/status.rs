//! Status command handler.

use crate::commands::await_initialization;
use clap::Args;
use faq_core::{config::AppConfig, AppResult};
use faq_knowledge::create_orchestrator;

/// Show initialization status
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Print the current snapshot without waiting for initialization to finish
    #[arg(long)]
    pub no_wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing status command");

        let assistant = create_orchestrator(config)?;
        let status = if self.no_wait {
            assistant.initialization_status()
        } else {
            await_initialization(&assistant, self.json).await
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            println!("State: {}", status.state);
            println!("Progress: {}", status.progress);
            println!("Documents: {}", status.document_count);
            if let Some(error) = &status.error {
                println!("Error: {}", error);
            }
        }

        Ok(())
    }
}
