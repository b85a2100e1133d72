//! Assistant factory.
//!
//! Builds a started [`RagOrchestrator`] from application configuration.

use crate::backend::SearchBackend;
use crate::corpus::source_for;
use crate::elasticsearch::ElasticsearchBackend;
use crate::memory::MemoryBackend;
use crate::rag::{RagComponents, RagOrchestrator};
use crate::search::SearchIndexClient;
use crate::supervisor::BootstrapSettings;
use faq_core::{AppConfig, AppResult, BackendKind};
use faq_llm::create_generator;
use faq_prompt::{load_prompt, PromptBuilder};
use std::sync::Arc;

/// Create the search backend selected by `config`.
pub fn create_backend(config: &AppConfig) -> AppResult<Arc<dyn SearchBackend>> {
    match config.backend {
        BackendKind::Elasticsearch => Ok(Arc::new(ElasticsearchBackend::new(
            &config.search_url,
            &config.index_name,
        )?)),
        BackendKind::Memory => Ok(Arc::new(MemoryBackend::new(&config.index_name))),
    }
}

/// Create the prompt builder, from the configured template file if any.
pub fn create_prompt_builder(config: &AppConfig) -> AppResult<PromptBuilder> {
    match &config.prompt_template {
        Some(path) => PromptBuilder::from_definition(&load_prompt(path)?),
        None => PromptBuilder::new(),
    }
}

/// Assemble every component described by `config` without starting anything.
pub fn create_components(config: &AppConfig) -> AppResult<RagComponents> {
    config.validate()?;

    let index = SearchIndexClient::new(create_backend(config)?);
    let prompts = create_prompt_builder(config)?;
    let generator = create_generator(config);
    let corpus = Arc::from(source_for(&config.corpus_url)?);

    tracing::debug!(
        backend = config.backend.as_str(),
        index = %config.index_name,
        corpus = %config.corpus_url,
        model = %config.model,
        prompt = prompts.source_id(),
        "Assembled assistant components"
    );

    Ok(RagComponents {
        index,
        prompts,
        generator,
        corpus,
        settings: BootstrapSettings::from(config),
        search_size: config.search_size,
    })
}

/// Build the assistant and start preparing its index in the background.
pub fn create_orchestrator(config: &AppConfig) -> AppResult<RagOrchestrator> {
    RagOrchestrator::start(create_components(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_core::AppError;
    use std::io::Write;

    #[test]
    fn test_create_backend_by_kind() {
        let config = AppConfig {
            backend: BackendKind::Memory,
            index_name: "faq".to_string(),
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "memory");
        assert_eq!(backend.index_name(), "faq");

        let backend = create_backend(&AppConfig::default()).unwrap();
        assert_eq!(backend.name(), "elasticsearch");
        assert_eq!(backend.index_name(), "course-questions");
    }

    #[test]
    fn test_create_components_rejects_invalid_config() {
        let config = AppConfig {
            search_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            create_components(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_prompt_builder_from_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "id: faq.short\ntitle: Short\ntemplate: \"Q: {{{{question}}}}\""
        )
        .unwrap();

        let config = AppConfig {
            prompt_template: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let builder = create_prompt_builder(&config).unwrap();
        assert_eq!(builder.source_id(), "faq.short");
        assert_eq!(builder.build("Why?", &[]).unwrap(), "Q: Why?");
    }

    #[tokio::test]
    async fn test_create_orchestrator_starts_bootstrap() {
        let config = AppConfig {
            backend: BackendKind::Memory,
            corpus_url: "/nonexistent/documents.json".to_string(),
            api_key: Some("sk-test".to_string()),
            connect_interval_ms: 0,
            ..Default::default()
        };

        let orchestrator = create_orchestrator(&config).unwrap();
        let status = orchestrator.supervisor().wait_until_settled().await;

        assert!(status.is_failed());
        assert!(status.error.unwrap().contains("/nonexistent/documents.json"));
    }
}
