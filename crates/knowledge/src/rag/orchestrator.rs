//! Top-level FAQ assistant.
//!
//! Composes the index client, prompt builder and answer generator behind
//! four operations, and owns the supervisor that prepares the index.

use crate::corpus::CorpusSource;
use crate::rag::types::{error_answer, not_ready_answer, NO_INFORMATION_ANSWER};
use crate::search::SearchIndexClient;
use crate::supervisor::{BootstrapSettings, InitializationSupervisor};
use crate::types::{HealthReport, InitializationState, InitializationStatus, DEFAULT_RESULT_SIZE};
use faq_core::AppResult;
use faq_llm::AnswerGenerator;
use faq_prompt::PromptBuilder;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Everything the orchestrator is assembled from.
pub struct RagComponents {
    pub index: SearchIndexClient,
    pub prompts: PromptBuilder,
    pub generator: AnswerGenerator,
    pub corpus: Arc<dyn CorpusSource>,
    pub settings: BootstrapSettings,
    pub search_size: usize,
}

impl RagComponents {
    /// Components with default bootstrap settings and result size.
    pub fn new(
        index: SearchIndexClient,
        prompts: PromptBuilder,
        generator: AnswerGenerator,
        corpus: Arc<dyn CorpusSource>,
    ) -> Self {
        Self {
            index,
            prompts,
            generator,
            corpus,
            settings: BootstrapSettings::default(),
            search_size: DEFAULT_RESULT_SIZE,
        }
    }
}

/// FAQ assistant facade.
///
/// Construct once and share by reference (`Arc`) across request handlers.
/// Every operation is safe to call while the index is still being prepared.
pub struct RagOrchestrator {
    index: SearchIndexClient,
    prompts: PromptBuilder,
    generator: AnswerGenerator,
    supervisor: InitializationSupervisor,
    search_size: usize,
}

impl RagOrchestrator {
    /// Assemble the assistant and launch index preparation in the
    /// background. Returns without waiting for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(components: RagComponents) -> AppResult<Self> {
        let supervisor = InitializationSupervisor::new(
            components.index.clone(),
            components.generator.clone(),
            components.corpus,
            components.settings,
        );
        supervisor.start()?;

        Ok(Self {
            index: components.index,
            prompts: components.prompts,
            generator: components.generator,
            supervisor,
            search_size: components.search_size.max(1),
        })
    }

    /// Answer a question, optionally restricted to one course.
    ///
    /// Never fails: before the index is ready this returns a not-ready
    /// message without touching the backend, and any fault in the pipeline
    /// becomes an apology text.
    #[tracing::instrument(skip(self))]
    pub async fn ask(&self, query: &str, course: Option<&str>) -> String {
        let status = self.supervisor.status();
        if !status.is_ready() {
            tracing::info!(state = %status.state, "Question received before index is ready");
            return not_ready_answer(&status);
        }

        match AssertUnwindSafe(self.answer(query, course)).catch_unwind().await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::error!("Question pipeline failed: {}", e);
                error_answer(&e.to_string())
            }
            Err(panic) => {
                let detail = panic_detail(panic.as_ref());
                tracing::error!("Question pipeline panicked: {}", detail);
                error_answer(&detail)
            }
        }
    }

    async fn answer(&self, query: &str, course: Option<&str>) -> AppResult<String> {
        let documents = self.index.search(query, course, self.search_size).await;

        if documents.is_empty() {
            tracing::info!("No matching documents");
            return Ok(NO_INFORMATION_ANSWER.to_string());
        }

        tracing::debug!("Retrieved {} documents", documents.len());

        let prompt = self.prompts.build(query, &documents)?;
        Ok(self.generator.generate(&prompt).await)
    }

    /// Report whether the assistant can serve questions right now.
    ///
    /// The first failing check decides the message.
    pub async fn health_check(&self) -> HealthReport {
        let status = self.supervisor.status();
        match status.state {
            InitializationState::Failed => {
                return HealthReport::unhealthy(status.error.unwrap_or_default())
            }
            InitializationState::Ready => {}
            _ => return HealthReport::unhealthy(status.progress),
        }

        if !self.index.ping().await {
            return HealthReport::unhealthy(format!(
                "{} not connected",
                display_name(self.index.backend_name())
            ));
        }

        if !self.generator.has_credential() {
            return HealthReport::unhealthy("OpenAI not configured");
        }

        match self.index.index_exists().await {
            Ok(true) => {}
            Ok(false) => {
                return HealthReport::unhealthy(format!(
                    "Index '{}' does not exist",
                    self.index.index_name()
                ))
            }
            Err(e) => return HealthReport::unhealthy(format!("Health check failed: {}", e)),
        }

        match self.index.count_documents().await {
            Ok(0) => HealthReport::unhealthy("No documents in index"),
            Ok(count) => HealthReport::healthy(format!("Healthy with {} documents", count)),
            Err(e) => HealthReport::unhealthy(format!("Health check failed: {}", e)),
        }
    }

    /// Distinct course names, or nothing while unhealthy.
    pub async fn get_courses(&self) -> Vec<String> {
        if !self.health_check().await.healthy {
            return Vec::new();
        }
        self.index.list_courses().await
    }

    /// Current bootstrap snapshot.
    pub fn initialization_status(&self) -> InitializationStatus {
        self.supervisor.status()
    }

    pub fn supervisor(&self) -> &InitializationSupervisor {
        &self.supervisor
    }
}

/// "elasticsearch" → "Elasticsearch"
fn display_name(backend: &str) -> String {
    let mut chars = backend.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}
