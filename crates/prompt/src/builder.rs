//! Prompt builder: question + retrieved FAQ entries → model prompt.

use crate::types::PromptDefinition;
use faq_core::{AppError, AppResult, Document};
use handlebars::Handlebars;
use serde::Serialize;

const TEMPLATE_NAME: &str = "prompt";

/// Built-in teaching-assistant template.
///
/// Each document renders as a `section / question / answer` triple followed
/// by a blank line; the trailing whitespace is trimmed after rendering.
const DEFAULT_TEMPLATE: &str = "\
You're a course teaching assistant. Answer the QUESTION based on the CONTEXT from the FAQ database.
Use only the facts from the CONTEXT when answering the QUESTION.

QUESTION: {{question}}

CONTEXT:
{{#each documents}}section: {{section}}
question: {{question}}
answer: {{text}}

{{/each}}";

#[derive(Serialize)]
struct PromptVariables<'a> {
    question: &'a str,
    documents: &'a [Document],
}

/// Renders prompts from a compiled Handlebars template.
///
/// Rendering is deterministic: the same question and documents always
/// produce the same prompt.
pub struct PromptBuilder {
    registry: Handlebars<'static>,
    source_id: String,
}

impl PromptBuilder {
    /// Builder using the built-in template.
    pub fn new() -> AppResult<Self> {
        Self::from_definition(&PromptDefinition {
            id: "faq.answer.default".to_string(),
            title: "Course teaching assistant".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        })
    }

    /// Builder using a custom prompt definition.
    pub fn from_definition(definition: &PromptDefinition) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Prompts are plain text, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(TEMPLATE_NAME, &definition.template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self {
            registry,
            source_id: definition.id.clone(),
        })
    }

    /// Identifier of the template in use.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Render the prompt for `question` over `documents`, in the given order.
    pub fn build(&self, question: &str, documents: &[Document]) -> AppResult<String> {
        tracing::debug!(
            prompt = %self.source_id,
            documents = documents.len(),
            "Building prompt"
        );

        let variables = PromptVariables {
            question,
            documents,
        };

        let rendered = self
            .registry
            .render(TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        Ok(rendered.trim().to_string())
    }
}
