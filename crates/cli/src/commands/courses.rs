//! Courses command handler.

use crate::commands::await_initialization;
use clap::Args;
use faq_core::{config::AppConfig, AppResult};
use faq_knowledge::create_orchestrator;

/// List the courses present in the FAQ index
#[derive(Args, Debug)]
pub struct CoursesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CoursesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing courses command");

        let assistant = create_orchestrator(config)?;
        await_initialization(&assistant, self.json).await;
        let courses = assistant.get_courses().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&courses)?);
        } else if courses.is_empty() {
            println!("No courses available");
        } else {
            for course in &courses {
                println!("{}", course);
            }
        }

        Ok(())
    }
}
