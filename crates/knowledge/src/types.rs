//! Search and initialization type definitions.

use serde::{Deserialize, Serialize};

/// Number of documents returned per question unless configured otherwise.
pub const DEFAULT_RESULT_SIZE: usize = 5;

/// Maximum number of distinct courses returned by the course listing.
pub const MAX_COURSES: usize = 100;

/// A single retrieval request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text matched against `question`, `text` and `section`
    pub text: String,

    /// Restrict results to this exact `course` value
    pub course_filter: Option<String>,

    /// Maximum number of documents to return
    pub size: usize,
}

impl SearchQuery {
    /// Create a query with the default result size and no filter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            course_filter: None,
            size: DEFAULT_RESULT_SIZE,
        }
    }

    /// Restrict results to a single course. Blank filters are ignored.
    pub fn with_course(mut self, course: Option<&str>) -> Self {
        self.course_filter = course
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string);
        self
    }

    /// Set the maximum number of results.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

/// Outcome of making sure the index schema exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// The index was created by this call
    Created,
    /// The index was already there (possibly created concurrently)
    AlreadyExists,
}

/// Lifecycle state of the bootstrap sequence.
///
/// `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitializationState {
    NotStarted,
    Connecting,
    LoadingData,
    Indexing,
    Ready,
    Failed,
}

impl InitializationState {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Position in the forward-only lifecycle.
    fn rank(&self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Connecting => 1,
            Self::LoadingData => 2,
            Self::Indexing => 3,
            Self::Ready | Self::Failed => 4,
        }
    }

    /// Whether moving from `self` to `next` respects the lifecycle.
    ///
    /// Staying in a non-terminal state is allowed (progress updates); any
    /// non-terminal state may fail; nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: InitializationState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Failed => *self != Self::NotStarted,
            Self::Ready => matches!(self, Self::LoadingData | Self::Indexing),
            _ => next.rank() >= self.rank(),
        }
    }

    /// Canonical upper-case name used on the polling surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Connecting => "CONNECTING",
            Self::LoadingData => "LOADING_DATA",
            Self::Indexing => "INDEXING",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for InitializationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the bootstrap sequence exposed to pollers.
///
/// `error` is `Some` exactly when `state` is `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationStatus {
    pub state: InitializationState,
    pub progress: String,
    pub error: Option<String>,
    pub document_count: u64,
}

impl InitializationStatus {
    /// Initial snapshot before `start()`.
    pub fn not_started() -> Self {
        Self {
            state: InitializationState::NotStarted,
            progress: "Not started".to_string(),
            error: None,
            document_count: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == InitializationState::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.state == InitializationState::Failed
    }
}

impl Default for InitializationStatus {
    fn default() -> Self {
        Self::not_started()
    }
}

/// Result of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub message: String,
}

impl HealthReport {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
        }
    }
}
