//! Course FAQ CLI
//!
//! Main entry point for the `faq` command-line tool.
//! Answers course questions from an indexed FAQ using retrieval-augmented
//! generation.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, CoursesCommand, HealthCommand, StatusCommand};
use faq_core::{config::AppConfig, logging, AppError, AppResult, BackendKind};
use std::path::PathBuf;

/// Course FAQ assistant - answers course questions from the FAQ index
#[derive(Parser, Debug)]
#[command(name = "faq")]
#[command(about = "Answer course questions from the FAQ index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "FAQ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Search backend (elasticsearch, memory)
    #[arg(short, long, global = true, env = "FAQ_BACKEND")]
    backend: Option<String>,

    /// Search backend base URL
    #[arg(long, global = true, env = "ELASTICSEARCH_URL")]
    search_url: Option<String>,

    /// Corpus URL or local JSON file
    #[arg(long, global = true, env = "FAQ_CORPUS_URL")]
    corpus: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "FAQ_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Ask questions interactively
    Chat(ChatCommand),

    /// Show initialization status
    Status(StatusCommand),

    /// Check whether the assistant can answer questions
    Health(HealthCommand),

    /// List available courses
    Courses(CoursesCommand),
}

impl Cli {
    fn backend_kind(&self) -> AppResult<Option<BackendKind>> {
        self.backend
            .as_deref()
            .map(|name| {
                BackendKind::parse(name).ok_or_else(|| {
                    AppError::Config(format!(
                        "Unknown search backend: {}. Supported: elasticsearch, memory",
                        name
                    ))
                })
            })
            .transpose()
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();
    let backend = cli.backend_kind()?;

    // Load base configuration from file and environment
    let config = AppConfig::load_from(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        backend,
        cli.search_url,
        cli.corpus,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Course FAQ CLI starting");
    tracing::debug!("Backend: {} at {}", config.backend.as_str(), config.search_url);
    tracing::debug!("Index: {}", config.index_name);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Status(_) => "status",
        Commands::Health(_) => "health",
        Commands::Courses(_) => "courses",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Status(cmd) => cmd.execute(&config).await,
        Commands::Health(cmd) => cmd.execute(&config).await,
        Commands::Courses(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_course() {
        let cli = Cli::try_parse_from([
            "faq",
            "--backend",
            "memory",
            "ask",
            "How do I run Kafka?",
            "--course",
            "data-engineering-zoomcamp",
        ])
        .unwrap();

        assert_eq!(cli.backend_kind().unwrap(), Some(BackendKind::Memory));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "How do I run Kafka?");
                assert_eq!(cmd.course.as_deref(), Some("data-engineering-zoomcamp"));
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let cli = Cli::try_parse_from(["faq", "--backend", "solr", "courses"]).unwrap();
        assert!(matches!(cli.backend_kind(), Err(AppError::Config(_))));
    }
}
