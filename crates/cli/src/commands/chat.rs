//! Chat command handler.
//!
//! Reads questions from stdin until EOF or `exit`. Each question is answered
//! on its own; no conversation history is kept.

use crate::commands::await_initialization;
use clap::Args;
use faq_core::{config::AppConfig, AppError, AppResult};
use faq_knowledge::create_orchestrator;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question loop
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Restrict answers to one course (exact course name)
    #[arg(short = 'C', long)]
    pub course: Option<String>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let assistant = create_orchestrator(config)?;
        let status = await_initialization(&assistant, false).await;
        if let Some(error) = status.error {
            return Err(AppError::Other(format!("Initialization failed: {}", error)));
        }

        match &self.course {
            Some(course) => {
                eprintln!("Answering questions about '{}'. Type 'exit' to quit.", course)
            }
            None => eprintln!("Answering questions about all courses. Type 'exit' to quit."),
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("> ");
            std::io::stderr().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if matches!(question, "exit" | "quit") {
                break;
            }

            let answer = assistant.ask(question, self.course.as_deref()).await;
            println!("{}\n", answer);
        }

        Ok(())
    }
}
