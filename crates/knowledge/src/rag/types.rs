//! User-facing answer texts.

use crate::types::InitializationStatus;

/// Answer when retrieval finds nothing to ground a response on.
pub const NO_INFORMATION_ANSWER: &str =
    "I couldn't find any relevant information in the course materials.";

/// Answer when the pipeline fails after the index became ready.
pub fn error_answer(detail: &str) -> String {
    format!(
        "Sorry, I encountered an error processing your question: {}",
        detail
    )
}

/// Answer while the index is still being prepared, or after it failed to.
pub fn not_ready_answer(status: &InitializationStatus) -> String {
    match &status.error {
        Some(error) => format!(
            "The assistant is unavailable: initialization failed ({}).",
            error
        ),
        None => format!(
            "The assistant is still starting up ({}: {}). Please try again shortly.",
            status.state, status.progress
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InitializationState;

    #[test]
    fn test_not_ready_answer_mentions_progress() {
        let status = InitializationStatus {
            state: InitializationState::Indexing,
            progress: "Indexed 100/948 documents".to_string(),
            error: None,
            document_count: 0,
        };

        let answer = not_ready_answer(&status);
        assert!(answer.contains("INDEXING"));
        assert!(answer.contains("Indexed 100/948 documents"));
    }

    #[test]
    fn test_not_ready_answer_mentions_failure() {
        let status = InitializationStatus {
            state: InitializationState::Failed,
            progress: "Waiting for search backend (attempt 30/30)".to_string(),
            error: Some("connection unavailable".to_string()),
            document_count: 0,
        };

        assert!(not_ready_answer(&status).contains("connection unavailable"));
    }
}
