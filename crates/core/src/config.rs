//! Configuration management for the course FAQ assistant.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (`faq.yaml` or the path in `FAQ_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Secrets (the answer generator's API key) are only ever read from the
//! environment, never from the YAML file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default Elasticsearch endpoint.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Fixed index holding the course FAQ documents.
pub const DEFAULT_INDEX_NAME: &str = "course-questions";

/// Public FAQ corpus used by the DataTalksClub courses.
pub const DEFAULT_CORPUS_URL: &str =
    "https://github.com/DataTalksClub/llm-zoomcamp/blob/main/01-intro/documents.json?raw=1";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1";

/// Model used for answer generation.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which search backend implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote Elasticsearch cluster over HTTP
    Elasticsearch,
    /// Process-local index (offline use and tests)
    Memory,
}

impl BackendKind {
    /// Parse backend kind from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "elasticsearch" | "es" => Some(Self::Elasticsearch),
            "memory" | "in-memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// Get the canonical backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::Memory => "memory",
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Search backend implementation
    pub backend: BackendKind,

    /// Base URL of the search backend
    pub search_url: String,

    /// Name of the FAQ index
    pub index_name: String,

    /// URL or filesystem path of the FAQ corpus JSON
    pub corpus_url: String,

    /// API key for the answer generator (environment only)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion service
    pub llm_endpoint: String,

    /// Model identifier used for every generation call
    pub model: String,

    /// Connectivity checks before giving up
    pub connect_attempts: u32,

    /// Delay between connectivity checks in milliseconds
    pub connect_interval_ms: u64,

    /// Progress is republished every this many indexed documents
    pub progress_every: usize,

    /// Number of documents retrieved per question
    pub search_size: usize,

    /// Optional YAML prompt definition replacing the built-in template
    pub prompt_template: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    search: Option<SearchSection>,
    corpus: Option<CorpusSection>,
    llm: Option<LlmSection>,
    bootstrap: Option<BootstrapSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSection {
    backend: Option<String>,
    url: Option<String>,
    index: Option<String>,
    size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CorpusSection {
    url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    endpoint: Option<String>,
    model: Option<String>,
    prompt_template: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BootstrapSection {
    connect_attempts: Option<u32>,
    connect_interval_ms: Option<u64>,
    progress_every: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            backend: BackendKind::Elasticsearch,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            corpus_url: DEFAULT_CORPUS_URL.to_string(),
            api_key: None,
            llm_endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_attempts: 30,
            connect_interval_ms: 2000,
            progress_every: 100,
            search_size: 5,
            prompt_template: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `FAQ_CONFIG`: Path to config file (default `./faq.yaml`)
    /// - `FAQ_BACKEND`: `elasticsearch` or `memory`
    /// - `ELASTICSEARCH_URL`: Search backend base URL
    /// - `FAQ_INDEX`: Index name
    /// - `FAQ_CORPUS_URL`: Corpus URL or path
    /// - `OPENAI_API_KEY`: Answer generator API key
    /// - `OPENAI_BASE_URL`: Completion service base URL
    /// - `FAQ_MODEL`: Model identifier
    /// - `FAQ_PROMPT_TEMPLATE`: YAML prompt definition path
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use faq_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Search backend: {}", config.search_url);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], reading the YAML file at `config_file` when
    /// given instead of the `FAQ_CONFIG` / `faq.yaml` default.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file
            .or_else(|| std::env::var("FAQ_CONFIG").ok().map(PathBuf::from));

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("faq.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(backend) = std::env::var("FAQ_BACKEND") {
            config.backend = parse_backend(&backend)?;
        }

        if let Ok(url) = std::env::var("ELASTICSEARCH_URL") {
            config.search_url = url;
        }

        if let Ok(index) = std::env::var("FAQ_INDEX") {
            config.index_name = index;
        }

        if let Ok(corpus) = std::env::var("FAQ_CORPUS_URL") {
            config.corpus_url = corpus;
        }

        if let Ok(endpoint) = std::env::var("OPENAI_BASE_URL") {
            config.llm_endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("FAQ_MODEL") {
            config.model = model;
        }

        if let Ok(template) = std::env::var("FAQ_PROMPT_TEMPLATE") {
            config.prompt_template = Some(PathBuf::from(template));
        }

        config.api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(search) = config_file.search {
            if let Some(backend) = search.backend {
                result.backend = parse_backend(&backend)?;
            }
            if let Some(url) = search.url {
                result.search_url = url;
            }
            if let Some(index) = search.index {
                result.index_name = index;
            }
            if let Some(size) = search.size {
                result.search_size = size;
            }
        }

        if let Some(url) = config_file.corpus.and_then(|c| c.url) {
            result.corpus_url = url;
        }

        if let Some(llm) = config_file.llm {
            if let Some(endpoint) = llm.endpoint {
                result.llm_endpoint = endpoint;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.prompt_template.is_some() {
                result.prompt_template = llm.prompt_template;
            }
        }

        if let Some(bootstrap) = config_file.bootstrap {
            if let Some(attempts) = bootstrap.connect_attempts {
                result.connect_attempts = attempts;
            }
            if let Some(interval) = bootstrap.connect_interval_ms {
                result.connect_interval_ms = interval;
            }
            if let Some(every) = bootstrap.progress_every {
                result.progress_every = every;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        backend: Option<BackendKind>,
        search_url: Option<String>,
        corpus_url: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(backend) = backend {
            self.backend = backend;
        }

        if let Some(search_url) = search_url {
            self.search_url = search_url;
        }

        if let Some(corpus_url) = corpus_url {
            self.corpus_url = corpus_url;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Delay between connectivity checks.
    pub fn connect_interval(&self) -> Duration {
        Duration::from_millis(self.connect_interval_ms)
    }

    /// Validate the configuration.
    ///
    /// A missing API key is deliberately not an error here: it is reported
    /// as an initialization failure by the bootstrap sequence.
    pub fn validate(&self) -> AppResult<()> {
        if self.connect_attempts == 0 {
            return Err(AppError::Config(
                "connectAttempts must be at least 1".to_string(),
            ));
        }

        if self.search_size == 0 {
            return Err(AppError::Config("search size must be at least 1".to_string()));
        }

        if self.progress_every == 0 {
            return Err(AppError::Config(
                "progressEvery must be at least 1".to_string(),
            ));
        }

        if self.index_name.trim().is_empty() {
            return Err(AppError::Config("index name must not be empty".to_string()));
        }

        if self.backend == BackendKind::Elasticsearch && !is_http_url(&self.search_url) {
            return Err(AppError::Config(format!(
                "Search URL must start with http:// or https://: {}",
                self.search_url
            )));
        }

        Ok(())
    }
}

fn parse_backend(value: &str) -> AppResult<BackendKind> {
    BackendKind::parse(value).ok_or_else(|| {
        AppError::Config(format!(
            "Unknown search backend: {}. Supported: elasticsearch, memory",
            value
        ))
    })
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
