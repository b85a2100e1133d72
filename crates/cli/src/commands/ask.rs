//! Ask command handler.
//!
//! Answers a single question from the course FAQ.

use crate::commands::await_initialization;
use clap::Args;
use faq_core::{config::AppConfig, AppError, AppResult};
use faq_knowledge::create_orchestrator;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Restrict the answer to one course (exact course name)
    #[arg(short = 'C', long)]
    pub course: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        if self.question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let assistant = create_orchestrator(config)?;
        let status = await_initialization(&assistant, self.json).await;

        let answer = assistant.ask(&self.question, self.course.as_deref()).await;

        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "course": self.course,
                "answer": answer,
                "model": config.model,
                "status": status,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
