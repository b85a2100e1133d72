//! Course FAQ Assistant Core Library
//!
//! This crate provides the foundational utilities shared by every crate in
//! the workspace:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The `Document` type exchanged between search, prompt and CLI

pub mod config;
pub mod document;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, BackendKind};
pub use document::Document;
pub use error::{AppError, AppResult};
