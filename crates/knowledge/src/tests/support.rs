//! Shared fakes for the knowledge tests.

use crate::backend::SearchBackend;
use crate::corpus::CorpusSource;
use crate::memory::MemoryBackend;
use crate::types::{SchemaOutcome, SearchQuery};
use faq_core::{AppError, AppResult, Document};
use faq_llm::{AnswerGenerator, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Small two-course corpus.
pub fn fixture_corpus() -> Vec<Document> {
    vec![
        Document::new(
            "data-engineering-zoomcamp",
            "General course-related questions",
            "Course - When will the course start?",
            "The next cohort starts in January.",
        ),
        Document::new(
            "data-engineering-zoomcamp",
            "Module 6: streaming with Kafka",
            "How do I run Kafka locally?",
            "Use docker-compose with the provided file.",
        ),
        Document::new(
            "machine-learning-zoomcamp",
            "General course-related questions",
            "Can I still join the course?",
            "Yes, you can join at any time.",
        ),
        Document::new(
            "machine-learning-zoomcamp",
            "Deployment",
            "How do I deploy a model with Docker?",
            "Build an image and run it.",
        ),
    ]
}

/// Completion client that answers with a fixed text and records prompts.
pub struct ScriptedLlm {
    reply: Result<String, String>,
    credential: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            credential: AtomicBool::new(true),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            credential: AtomicBool::new(true),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credential() -> Self {
        Self {
            credential: AtomicBool::new(false),
            ..Self::replying("unused")
        }
    }

    /// Simulate the API key disappearing after startup.
    pub fn revoke_credential(&self) {
        self.credential.store(false, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn has_credential(&self) -> bool {
        self.credential.load(Ordering::SeqCst)
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(100, 10),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }
}

/// Generator over a [`ScriptedLlm`], with or without a credential.
pub fn generator(with_key: bool) -> AnswerGenerator {
    let client = if with_key {
        ScriptedLlm::replying("Scripted answer.")
    } else {
        ScriptedLlm::without_credential()
    };
    AnswerGenerator::new(Arc::new(client), "gpt-4o-mini")
}

/// Corpus served from memory; counts fetches.
pub struct StaticCorpus {
    documents: Vec<Document>,
    fetches: AtomicUsize,
}

impl StaticCorpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CorpusSource for StaticCorpus {
    fn describe(&self) -> String {
        "static fixture".to_string()
    }

    async fn fetch(&self) -> AppResult<Vec<Document>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.clone())
    }
}

/// Failures a [`CountingBackend`] injects on demand.
#[derive(Debug, Default)]
pub struct Faults {
    /// Reject the write for this document id
    pub write_at: Option<u64>,
    /// Reject refresh
    pub refresh: bool,
    /// Pretend the index is gone
    pub index_absent: bool,
    /// Report zero documents
    pub empty: bool,
}

/// Wraps a [`MemoryBackend`], counting calls and injecting [`Faults`];
/// pings can be forced to fail.
pub struct CountingBackend {
    inner: MemoryBackend,
    ping_ok: bool,
    faults: Mutex<Faults>,
    pings: AtomicUsize,
    writes: AtomicUsize,
    queries: AtomicUsize,
}

impl CountingBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            ping_ok: true,
            faults: Mutex::new(Faults::default()),
            pings: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Backend whose liveness check never succeeds.
    pub fn unreachable(inner: MemoryBackend) -> Self {
        Self {
            ping_ok: false,
            ..Self::new(inner)
        }
    }

    /// Change the injected failures; applies to every later call.
    pub fn inject(&self, update: impl FnOnce(&mut Faults)) {
        update(&mut self.faults.lock().unwrap());
    }

    fn faults<T>(&self, read: impl FnOnce(&Faults) -> T) -> T {
        read(&self.faults.lock().unwrap())
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    fn index_name(&self) -> &str {
        self.inner.index_name()
    }

    async fn ping(&self) -> bool {
        self.pings.fetch_add(1, Ordering::SeqCst);
        self.ping_ok && self.inner.ping().await
    }

    async fn index_exists(&self) -> AppResult<bool> {
        if self.faults(|f| f.index_absent) {
            return Ok(false);
        }
        self.inner.index_exists().await
    }

    async fn create_index(&self) -> AppResult<SchemaOutcome> {
        self.inner.create_index().await
    }

    async fn upsert_document(&self, id: u64, document: &Document) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.faults(|f| f.write_at == Some(id)) {
            return Err(AppError::Search("write boom".to_string()));
        }
        self.inner.upsert_document(id, document).await
    }

    async fn refresh(&self) -> AppResult<()> {
        if self.faults(|f| f.refresh) {
            return Err(AppError::Search("refresh boom".to_string()));
        }
        self.inner.refresh().await
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query).await
    }

    async fn course_terms(&self, limit: usize) -> AppResult<Vec<String>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.course_terms(limit).await
    }

    async fn count(&self) -> AppResult<u64> {
        if self.faults(|f| f.index_absent) {
            return Err(AppError::IndexNotFound(self.index_name().to_string()));
        }
        if self.faults(|f| f.empty) {
            return Ok(0);
        }
        self.inner.count().await
    }
}
