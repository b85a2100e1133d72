//! FAQ index client.
//!
//! Wraps a [`SearchBackend`] with the policies the rest of the system
//! relies on: idempotent schema creation, and query-time operations that
//! degrade to empty results instead of failing.

use crate::backend::SearchBackend;
use crate::types::{SchemaOutcome, SearchQuery, MAX_COURSES};
use faq_core::{AppResult, Document};
use std::sync::Arc;

/// Client for the FAQ index, shared by the supervisor and the orchestrator.
#[derive(Clone)]
pub struct SearchIndexClient {
    backend: Arc<dyn SearchBackend>,
}

impl SearchIndexClient {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn index_name(&self) -> &str {
        self.backend.index_name()
    }

    /// Liveness check.
    pub async fn ping(&self) -> bool {
        self.backend.ping().await
    }

    pub async fn index_exists(&self) -> AppResult<bool> {
        self.backend.index_exists().await
    }

    /// Create the index unless it already exists.
    pub async fn ensure_schema(&self) -> AppResult<SchemaOutcome> {
        if self.backend.index_exists().await? {
            tracing::info!("Index {} already exists", self.index_name());
            return Ok(SchemaOutcome::AlreadyExists);
        }

        let outcome = self.backend.create_index().await?;
        match outcome {
            SchemaOutcome::Created => tracing::info!("Created index {}", self.index_name()),
            SchemaOutcome::AlreadyExists => {
                tracing::info!("Index {} already exists", self.index_name())
            }
        }
        Ok(outcome)
    }

    /// Upsert a document under `id`.
    pub async fn write_document(&self, id: u64, document: &Document) -> AppResult<()> {
        self.backend.upsert_document(id, document).await
    }

    /// Make written documents searchable. Call once after a bulk load.
    pub async fn refresh(&self) -> AppResult<()> {
        self.backend.refresh().await
    }

    /// Ranked search; empty on no match or on backend failure.
    pub async fn search(&self, text: &str, course: Option<&str>, size: usize) -> Vec<Document> {
        let query = SearchQuery::new(text).with_course(course).with_size(size);

        match self.backend.search(&query).await {
            Ok(documents) => {
                tracing::debug!(
                    hits = documents.len(),
                    course = ?query.course_filter,
                    "Search completed"
                );
                documents
            }
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Distinct courses present in the index; empty on failure.
    pub async fn list_courses(&self) -> Vec<String> {
        match self.backend.course_terms(MAX_COURSES).await {
            Ok(courses) => courses,
            Err(e) => {
                tracing::error!("Failed to get courses: {}", e);
                Vec::new()
            }
        }
    }

    /// Document count; fails with `AppError::IndexNotFound` when absent.
    pub async fn count_documents(&self) -> AppResult<u64> {
        self.backend.count().await
    }
}
