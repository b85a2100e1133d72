//! Background bootstrap of the FAQ index.
//!
//! The supervisor drives a one-shot state machine:
//!
//! ```text
//! NOT_STARTED → CONNECTING → LOADING_DATA → INDEXING → READY
//!                    └────────────┴─────────────┴──────→ FAILED
//! ```
//!
//! The current [`InitializationStatus`] lives in a `tokio::sync::watch`
//! channel. Every update replaces the whole snapshot, so pollers always read
//! a consistent value and never wait on the bootstrap task.

use crate::corpus::CorpusSource;
use crate::search::SearchIndexClient;
use crate::types::{InitializationState, InitializationStatus};
use faq_core::{AppConfig, AppError, AppResult, Document};
use faq_llm::AnswerGenerator;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Tunables for the bootstrap sequence.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Connectivity checks before giving up
    pub connect_attempts: u32,
    /// Delay between pings
    pub connect_interval: Duration,
    /// Republish progress every this many written documents
    pub progress_every: usize,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            connect_attempts: 30,
            connect_interval: Duration::from_secs(2),
            progress_every: 100,
        }
    }
}

impl From<&AppConfig> for BootstrapSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            connect_attempts: config.connect_attempts.max(1),
            connect_interval: config.connect_interval(),
            progress_every: config.progress_every.max(1),
        }
    }
}

struct Inner {
    index: SearchIndexClient,
    generator: AnswerGenerator,
    corpus: Arc<dyn CorpusSource>,
    settings: BootstrapSettings,
    status: watch::Sender<InitializationStatus>,
    started: AtomicBool,
}

/// Owns the bootstrap sequence and publishes its status.
///
/// Cloning shares the same state machine.
#[derive(Clone)]
pub struct InitializationSupervisor {
    inner: Arc<Inner>,
}

impl InitializationSupervisor {
    pub fn new(
        index: SearchIndexClient,
        generator: AnswerGenerator,
        corpus: Arc<dyn CorpusSource>,
        settings: BootstrapSettings,
    ) -> Self {
        let (status, _) = watch::channel(InitializationStatus::not_started());

        Self {
            inner: Arc::new(Inner {
                index,
                generator,
                corpus,
                settings,
                status,
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Launch the bootstrap sequence on a background task.
    ///
    /// Returns immediately. Fails with `AppError::AlreadyStarted` if the
    /// sequence was launched before; no second task is spawned.
    pub fn start(&self) -> AppResult<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::Other(format!("No async runtime available: {}", e)))?;

        if self
            .inner
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::AlreadyStarted);
        }

        self.inner.transition(InitializationState::Connecting, |current| {
            InitializationStatus {
                state: InitializationState::Connecting,
                progress: "Connecting to search backend".to_string(),
                ..current.clone()
            }
        });

        tracing::info!(
            backend = self.inner.index.backend_name(),
            index = self.inner.index.index_name(),
            "Starting initialization"
        );

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move { inner.run().await });

        Ok(())
    }

    /// Latest status snapshot. Never blocks on the bootstrap task.
    pub fn status(&self) -> InitializationStatus {
        self.inner.status.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.status.borrow().is_ready()
    }

    /// Receiver observing every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<InitializationStatus> {
        self.inner.status.subscribe()
    }

    /// Wait until the state is READY or FAILED and return that snapshot.
    pub async fn wait_until_settled(&self) -> InitializationStatus {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(|s| s.state.is_terminal()).await {
            Ok(status) => status.clone(),
            // The sender lives as long as `self`
            Err(_) => self.status(),
        };
        settled
    }
}

impl Inner {
    /// Replace the snapshot if the lifecycle allows moving to `next`.
    fn transition(
        &self,
        next: InitializationState,
        update: impl FnOnce(&InitializationStatus) -> InitializationStatus,
    ) -> bool {
        self.status.send_if_modified(|current| {
            if !current.state.can_transition_to(next) {
                tracing::warn!(from = %current.state, to = %next, "Ignoring invalid transition");
                return false;
            }
            *current = update(current);
            true
        })
    }

    fn report(&self, state: InitializationState, progress: impl Into<String>) {
        let progress = progress.into();
        tracing::debug!(state = %state, "{}", progress);
        self.transition(state, |current| InitializationStatus {
            state,
            progress,
            ..current.clone()
        });
    }

    fn fail(&self, error: &str) {
        self.transition(InitializationState::Failed, |current| InitializationStatus {
            state: InitializationState::Failed,
            progress: current.progress.clone(),
            error: Some(error.to_string()),
            document_count: current.document_count,
        });
    }

    fn ready(&self, document_count: u64) {
        self.transition(InitializationState::Ready, |_| InitializationStatus {
            state: InitializationState::Ready,
            progress: format!("Ready with {} documents", document_count),
            error: None,
            document_count,
        });
    }

    async fn run(&self) {
        match AssertUnwindSafe(self.bootstrap()).catch_unwind().await {
            Ok(Ok(document_count)) => {
                tracing::info!("Initialization completed with {} documents", document_count);
                self.ready(document_count);
            }
            Ok(Err(e)) => {
                tracing::error!("Initialization failed: {}", e);
                self.fail(&e.to_string());
            }
            Err(_) => {
                tracing::error!("Initialization task panicked");
                self.fail("initialization task panicked");
            }
        }
    }

    async fn bootstrap(&self) -> AppResult<u64> {
        self.connect().await?;

        if !self.generator.has_credential() {
            return Err(AppError::MissingCredential);
        }

        self.report(InitializationState::LoadingData, "Checking existing index");
        match self.index.count_documents().await {
            Ok(count) if count > 0 => {
                tracing::info!("Data already exists ({} documents)", count);
                return Ok(count);
            }
            Ok(_) => tracing::info!("Index is empty, loading data"),
            Err(AppError::IndexNotFound(_)) => tracing::info!("Index is absent, loading data"),
            Err(e) => tracing::warn!("Could not count documents, loading data: {}", e),
        }

        self.report(InitializationState::LoadingData, "Creating index");
        self.index.ensure_schema().await?;

        self.report(
            InitializationState::LoadingData,
            format!("Fetching course documents from {}", self.corpus.describe()),
        );
        let documents = self.corpus.fetch().await?;
        if documents.is_empty() {
            return Err(AppError::Corpus("corpus contains no documents".to_string()));
        }

        self.index_documents(&documents).await
    }

    /// Ping the backend until it answers or the attempts run out.
    async fn connect(&self) -> AppResult<()> {
        let attempts = self.settings.connect_attempts;

        for attempt in 1..=attempts {
            if attempt > 1 {
                self.report(
                    InitializationState::Connecting,
                    format!("Waiting for search backend (attempt {}/{})", attempt, attempts),
                );
            }

            let ping_started = Instant::now();
            if self.index.ping().await {
                tracing::info!("Connected to {}", self.index.backend_name());
                return Ok(());
            }

            tracing::info!(
                "Waiting for {}... (attempt {}/{})",
                self.index.backend_name(),
                attempt,
                attempts
            );

            if attempt < attempts {
                let delay = retry_delay(self.settings.connect_interval, ping_started.elapsed());
                tokio::time::sleep(delay).await;
            }
        }

        Err(AppError::ConnectionUnavailable)
    }

    /// Write every document under its position, then refresh once.
    async fn index_documents(&self, documents: &[Document]) -> AppResult<u64> {
        let total = documents.len();
        let every = self.settings.progress_every.max(1);

        self.report(
            InitializationState::Indexing,
            format!("Indexed 0/{} documents", total),
        );

        for (position, document) in documents.iter().enumerate() {
            self.index.write_document(position as u64, document).await?;

            let written = position + 1;
            if written % every == 0 && written < total {
                self.report(
                    InitializationState::Indexing,
                    format!("Indexed {}/{} documents", written, total),
                );
            }
        }

        self.report(
            InitializationState::Indexing,
            format!("Indexed {}/{} documents, refreshing", total, total),
        );
        self.index.refresh().await?;

        tracing::info!("Indexed {} documents", total);
        Ok(total as u64)
    }
}

/// Time left to wait before the next ping, so that attempts start
/// `interval` apart however long a failed ping took.
fn retry_delay(interval: Duration, ping_elapsed: Duration) -> Duration {
    interval.saturating_sub(ping_elapsed)
}
