//! Process-local search backend.
//!
//! Implements the same contract as the Elasticsearch backend without a
//! server: writes become visible on `refresh`, the `course` filter is an
//! exact match, and scoring follows best-fields semantics (the best single
//! field wins, `question` boosted ×3).

use crate::backend::SearchBackend;
use crate::types::{SchemaOutcome, SearchQuery};
use faq_core::{AppError, AppResult, Document};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

const QUESTION_BOOST: f32 = 3.0;
const TEXT_BOOST: f32 = 1.0;
const SECTION_BOOST: f32 = 1.0;

#[derive(Debug, Default)]
struct MemoryIndex {
    /// Every write, including ones not yet refreshed
    pending: BTreeMap<u64, Document>,
    /// What search and count see
    visible: BTreeMap<u64, Document>,
}

/// In-memory FAQ index.
#[derive(Debug)]
pub struct MemoryBackend {
    index_name: String,
    index: RwLock<Option<MemoryIndex>>,
    reachable: AtomicBool,
}

impl MemoryBackend {
    /// Empty backend; the index does not exist until created.
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            index: RwLock::new(None),
            reachable: AtomicBool::new(true),
        }
    }

    /// Backend whose index already holds `documents` (ids `0..n`), refreshed.
    pub fn with_documents(index_name: impl Into<String>, documents: Vec<Document>) -> Self {
        let docs: BTreeMap<u64, Document> = documents
            .into_iter()
            .enumerate()
            .map(|(i, doc)| (i as u64, doc))
            .collect();

        let backend = Self::new(index_name);
        *backend.index.write().unwrap_or_else(|e| e.into_inner()) = Some(MemoryIndex {
            pending: docs.clone(),
            visible: docs,
        });
        backend
    }

    /// Simulate the backend going away or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryIndex) -> T) -> AppResult<T> {
        let guard = self.index.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .map(f)
            .ok_or_else(|| AppError::IndexNotFound(self.index_name.clone()))
    }

    fn check_reachable(&self) -> AppResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Search("memory backend unreachable".to_string()))
        }
    }
}

/// Lower-cased alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Length-normalised term score of one field.
fn field_score(field: &str, terms: &HashSet<String>) -> f32 {
    let tokens = tokenize(field);
    if tokens.is_empty() {
        return 0.0;
    }

    let mut frequencies: HashMap<&str, u32> = HashMap::new();
    for token in &tokens {
        *frequencies.entry(token.as_str()).or_insert(0) += 1;
    }

    let raw: f32 = terms
        .iter()
        .filter_map(|term| frequencies.get(term.as_str()))
        .map(|&tf| 1.0 + (tf as f32).ln())
        .sum();

    raw / (tokens.len() as f32).sqrt()
}

/// Best-fields score: the highest boosted single-field score.
fn best_fields_score(doc: &Document, terms: &HashSet<String>) -> f32 {
    [
        field_score(&doc.question, terms) * QUESTION_BOOST,
        field_score(&doc.text, terms) * TEXT_BOOST,
        field_score(&doc.section, terms) * SECTION_BOOST,
    ]
    .into_iter()
    .fold(0.0, f32::max)
}

#[async_trait::async_trait]
impl SearchBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn ping(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    async fn index_exists(&self) -> AppResult<bool> {
        self.check_reachable()?;
        Ok(self.index.read().unwrap_or_else(|e| e.into_inner()).is_some())
    }

    async fn create_index(&self) -> AppResult<SchemaOutcome> {
        self.check_reachable()?;
        let mut guard = self.index.write().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return Ok(SchemaOutcome::AlreadyExists);
        }
        *guard = Some(MemoryIndex::default());
        Ok(SchemaOutcome::Created)
    }

    async fn upsert_document(&self, id: u64, document: &Document) -> AppResult<()> {
        self.check_reachable()?;
        let mut guard = self.index.write().unwrap_or_else(|e| e.into_inner());
        // Writes auto-create the index, as Elasticsearch does
        guard
            .get_or_insert_with(MemoryIndex::default)
            .pending
            .insert(id, document.clone());
        Ok(())
    }

    async fn refresh(&self) -> AppResult<()> {
        self.check_reachable()?;
        let mut guard = self.index.write().unwrap_or_else(|e| e.into_inner());
        let index = guard
            .as_mut()
            .ok_or_else(|| AppError::IndexNotFound(self.index_name.clone()))?;
        index.visible = index.pending.clone();
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        self.check_reachable()?;
        let terms: HashSet<String> = tokenize(&query.text).into_iter().collect();

        self.read(|index| {
            let mut scored: Vec<(u64, f32, &Document)> = index
                .visible
                .iter()
                .filter(|(_, doc)| match &query.course_filter {
                    Some(course) => doc.course == *course,
                    None => true,
                })
                .map(|(id, doc)| (*id, best_fields_score(doc, &terms), doc))
                .filter(|(_, score, _)| *score > 0.0)
                .collect();

            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(CmpOrdering::Equal)
                    .then(a.0.cmp(&b.0))
            });

            scored
                .into_iter()
                .take(query.size)
                .map(|(_, _, doc)| doc.clone())
                .collect()
        })
    }

    async fn course_terms(&self, limit: usize) -> AppResult<Vec<String>> {
        self.check_reachable()?;
        self.read(|index| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for doc in index.visible.values() {
                *counts.entry(doc.course.as_str()).or_insert(0) += 1;
            }

            // Same ordering as a terms aggregation: doc count desc, key asc
            let mut buckets: Vec<(&str, usize)> = counts.into_iter().collect();
            buckets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

            buckets
                .into_iter()
                .take(limit)
                .map(|(course, _)| course.to_string())
                .collect()
        })
    }

    async fn count(&self) -> AppResult<u64> {
        self.check_reachable()?;
        self.read(|index| index.visible.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(course: &str, section: &str, question: &str, text: &str) -> Document {
        Document::new(course, section, question, text)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("How do I run Kafka? (docker-compose)"),
            vec!["how", "do", "i", "run", "kafka", "docker", "compose"]
        );
    }

    #[test]
    fn test_best_fields_takes_max_not_sum() {
        let terms: HashSet<String> = ["kafka".to_string()].into_iter().collect();
        let everywhere = doc("c1", "kafka", "kafka", "kafka");
        let question_only = doc("c1", "x", "kafka", "x");

        assert_eq!(
            best_fields_score(&everywhere, &terms),
            best_fields_score(&question_only, &terms)
        );
    }

    #[tokio::test]
    async fn test_count_fails_when_index_absent() {
        let backend = MemoryBackend::new("faq");
        assert!(!backend.index_exists().await.unwrap());
        assert!(matches!(
            backend.count().await,
            Err(AppError::IndexNotFound(name)) if name == "faq"
        ));
    }

    #[tokio::test]
    async fn test_writes_visible_only_after_refresh() {
        let backend = MemoryBackend::new("faq");
        assert_eq!(backend.create_index().await.unwrap(), SchemaOutcome::Created);

        let kafka = doc("c1", "General", "How do I run Kafka?", "Use docker-compose.");
        backend.upsert_document(0, &kafka).await.unwrap();
        assert_eq!(backend.count().await.unwrap(), 0);
        assert!(backend.search(&SearchQuery::new("kafka")).await.unwrap().is_empty());

        backend.refresh().await.unwrap();
        assert_eq!(backend.count().await.unwrap(), 1);
        assert_eq!(backend.search(&SearchQuery::new("kafka")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let backend = MemoryBackend::new("faq");
        backend.create_index().await.unwrap();
        backend.upsert_document(7, &doc("c1", "s", "old", "old")).await.unwrap();
        backend.upsert_document(7, &doc("c1", "s", "new", "new")).await.unwrap();
        backend.refresh().await.unwrap();

        assert_eq!(backend.count().await.unwrap(), 1);
        let hits = backend.search(&SearchQuery::new("new")).await.unwrap();
        assert_eq!(hits[0].question, "new");
    }

    #[tokio::test]
    async fn test_create_index_is_idempotent() {
        let backend = MemoryBackend::new("faq");
        assert_eq!(backend.create_index().await.unwrap(), SchemaOutcome::Created);
        assert_eq!(backend.create_index().await.unwrap(), SchemaOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn test_course_terms_ordering_and_limit() {
        let backend = MemoryBackend::with_documents(
            "faq",
            vec![
                doc("b-course", "s", "q", "t"),
                doc("a-course", "s", "q", "t"),
                doc("c-course", "s", "q", "t"),
                doc("c-course", "s", "q", "t"),
            ],
        );

        assert_eq!(
            backend.course_terms(100).await.unwrap(),
            vec!["c-course", "a-course", "b-course"]
        );
        assert_eq!(backend.course_terms(1).await.unwrap(), vec!["c-course"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let backend = MemoryBackend::with_documents("faq", vec![doc("c1", "s", "q", "t")]);
        backend.set_reachable(false);

        assert!(!backend.ping().await);
        assert!(backend.count().await.is_err());
        assert!(backend.search(&SearchQuery::new("q")).await.is_err());
    }
}
