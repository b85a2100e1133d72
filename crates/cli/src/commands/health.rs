//! Health command handler.

use crate::commands::await_initialization;
use clap::Args;
use faq_core::{config::AppConfig, AppError, AppResult};
use faq_knowledge::create_orchestrator;

/// Check whether the assistant can answer questions
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing health command");

        let assistant = create_orchestrator(config)?;
        await_initialization(&assistant, self.json).await;
        let report = assistant.health_check().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            let label = if report.healthy { "healthy" } else { "unhealthy" };
            println!("{}: {}", label, report.message);
        }

        if report.healthy {
            Ok(())
        } else {
            Err(AppError::Other(report.message))
        }
    }
}
