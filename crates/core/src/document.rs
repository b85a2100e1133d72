//! Shared FAQ document type.

use serde::{Deserialize, Serialize};

/// A single FAQ entry as stored in the search index.
///
/// `text`, `section` and `question` are free-text fields; `course` is an
/// exact-match keyword. A document's identity is the zero-based position it
/// was written at during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Answer body
    pub text: String,

    /// FAQ section heading
    pub section: String,

    /// The question this entry answers
    pub question: String,

    /// Course the entry belongs to
    pub course: String,
}

impl Document {
    /// Create a new document.
    pub fn new(
        course: impl Into<String>,
        section: impl Into<String>,
        question: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            section: section.into(),
            question: question.into(),
            course: course.into(),
        }
    }
}
