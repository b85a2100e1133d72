//! Prompt types for the course FAQ assistant.

use serde::{Deserialize, Serialize};

/// A prompt definition, either built in or loaded from YAML.
///
/// The template is rendered with Handlebars. Available variables:
/// - `question`: the user's question
/// - `documents`: retrieved FAQ entries, each with `section`, `question`,
///   `text` and `course`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: faq.answer.terse
title: Terse FAQ answer
template: "Q: {{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "faq.answer.terse");
        assert_eq!(def.title, "Terse FAQ answer");
        assert_eq!(def.template, "Q: {{question}}");
    }
}
