//! Error types for the course FAQ assistant.
//!
//! This module defines a unified error enum that covers every failure
//! category in the workspace: configuration, I/O, search backend, corpus
//! loading, prompt rendering, answer generation and initialization.

use thiserror::Error;

/// Unified error type for the course FAQ assistant.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic: errors are represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Answer generation (LLM provider) errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Search backend transport or protocol errors
    #[error("Search error: {0}")]
    Search(String),

    /// The target index is absent (distinct from an empty index)
    #[error("Index '{0}' does not exist")]
    IndexNotFound(String),

    /// Corpus fetch or parse errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Search backend never answered a ping within the allowed attempts
    #[error("connection unavailable")]
    ConnectionUnavailable,

    /// The answer generator's API key is not configured
    #[error("missing credential")]
    MissingCredential,

    /// `start()` was called on a supervisor that already left NOT_STARTED
    #[error("initialization already started")]
    AlreadyStarted,

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
