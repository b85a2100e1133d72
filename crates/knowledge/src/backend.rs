//! Search backend abstraction.
//!
//! Defines a trait for the document store behind the FAQ index so the
//! bootstrap sequence and the question pipeline do not depend on a concrete
//! engine.

use crate::types::{SchemaOutcome, SearchQuery};
use faq_core::{AppResult, Document};

/// Trait for search index backends.
///
/// Implementations must support:
/// - A cheap liveness check
/// - Creating the fixed FAQ schema
/// - Upserting documents by numeric id and making them visible on refresh
/// - Best-fields search with an optional exact `course` filter
/// - Listing distinct `course` values
/// - Counting documents, failing with `AppError::IndexNotFound` when the
///   index is absent
///
/// All methods take `&self`; backends are shared across concurrent callers.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logs and diagnostics (e.g., "elasticsearch").
    fn name(&self) -> &str;

    /// Name of the index this backend reads and writes.
    fn index_name(&self) -> &str;

    /// Liveness check. Never errors; unreachable means `false`.
    async fn ping(&self) -> bool;

    /// Whether the index exists.
    async fn index_exists(&self) -> AppResult<bool>;

    /// Create the index with the FAQ schema.
    ///
    /// Losing a creation race to another caller yields
    /// `SchemaOutcome::AlreadyExists`, not an error.
    async fn create_index(&self) -> AppResult<SchemaOutcome>;

    /// Insert or overwrite the document stored under `id`.
    async fn upsert_document(&self, id: u64, document: &Document) -> AppResult<()>;

    /// Make every write so far visible to search and count.
    async fn refresh(&self) -> AppResult<()>;

    /// Ranked search, most relevant first.
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Document>>;

    /// Distinct `course` values, at most `limit`.
    async fn course_terms(&self, limit: usize) -> AppResult<Vec<String>>;

    /// Number of searchable documents.
    async fn count(&self) -> AppResult<u64>;
}
