//! FAQ corpus sources.
//!
//! The corpus is a JSON array of courses:
//!
//! ```json
//! [{"course": "data-engineering-zoomcamp",
//!   "documents": [{"text": "...", "section": "...", "question": "..."}]}]
//! ```
//!
//! Flattening tags every document with its course. Malformed courses or
//! documents are skipped with a warning; only a payload that is not an array
//! at all is an error.

use faq_core::{AppError, AppResult, Document};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Download timeout in seconds
const FETCH_TIMEOUT_SECS: u64 = 60;

/// A place the corpus can be fetched from.
#[async_trait::async_trait]
pub trait CorpusSource: Send + Sync {
    /// Human-readable location for logs.
    fn describe(&self) -> String;

    /// Fetch and flatten the corpus.
    async fn fetch(&self) -> AppResult<Vec<Document>>;
}

/// Corpus served over HTTP(S).
pub struct HttpCorpus {
    url: String,
    client: reqwest::Client,
}

impl HttpCorpus {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Corpus(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl CorpusSource for HttpCorpus {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> AppResult<Vec<Document>> {
        tracing::info!("Fetching course documents from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Corpus(format!("Failed to fetch {}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Corpus(format!(
                "Failed to fetch {}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Corpus(format!("Invalid corpus JSON: {}", e)))?;

        flatten_corpus(&payload)
    }
}

/// Corpus stored on the local filesystem.
pub struct FileCorpus {
    path: PathBuf,
}

impl FileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CorpusSource for FileCorpus {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> AppResult<Vec<Document>> {
        tracing::info!("Reading course documents from {:?}", self.path);

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Corpus(format!("Failed to read {:?}: {}", self.path, e))
        })?;

        let payload: Value = serde_json::from_str(&contents)
            .map_err(|e| AppError::Corpus(format!("Invalid corpus JSON: {}", e)))?;

        flatten_corpus(&payload)
    }
}

/// Pick the source for a configured location: URLs over HTTP, anything
/// else from disk.
pub fn source_for(location: &str) -> AppResult<Box<dyn CorpusSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpCorpus::new(location)?))
    } else {
        Ok(Box::new(FileCorpus::new(location)))
    }
}

/// Flatten the per-course payload into tagged documents.
pub fn flatten_corpus(payload: &Value) -> AppResult<Vec<Document>> {
    let courses = payload.as_array().ok_or_else(|| {
        AppError::Corpus("Expected a JSON array of courses".to_string())
    })?;

    let mut documents = Vec::new();
    let mut skipped = 0usize;

    for (course_idx, entry) in courses.iter().enumerate() {
        let Some(course) = entry.get("course").and_then(Value::as_str) else {
            tracing::warn!("Skipping course entry {}: missing \"course\" name", course_idx);
            skipped += 1;
            continue;
        };

        let Some(docs) = entry.get("documents").and_then(Value::as_array) else {
            tracing::warn!("Skipping course '{}': missing \"documents\" array", course);
            skipped += 1;
            continue;
        };

        for (doc_idx, doc) in docs.iter().enumerate() {
            let field = |name: &str| doc.get(name).and_then(Value::as_str).map(str::to_string);

            match (field("text"), field("section"), field("question")) {
                (Some(text), Some(section), Some(question)) => {
                    documents.push(Document {
                        text,
                        section,
                        question,
                        course: course.to_string(),
                    });
                }
                _ => {
                    tracing::warn!(
                        "Skipping malformed document {} in course '{}'",
                        doc_idx,
                        course
                    );
                    skipped += 1;
                }
            }
        }
    }

    tracing::info!(
        "Loaded {} documents from {} courses ({} entries skipped)",
        documents.len(),
        courses.len(),
        skipped
    );

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_flatten_tags_course() {
        let payload = json!([
            {"course": "c1", "documents": [
                {"text": "Use docker-compose.", "section": "General", "question": "How do I run Kafka?"}
            ]},
            {"course": "c2", "documents": [
                {"text": "a", "section": "b", "question": "c"},
                {"text": "d", "section": "e", "question": "f"}
            ]}
        ]);

        let docs = flatten_corpus(&payload).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs[0],
            Document::new("c1", "General", "How do I run Kafka?", "Use docker-compose.")
        );
        assert_eq!(docs[2].course, "c2");
        assert_eq!(docs[2].question, "f");
    }

    #[test]
    fn test_flatten_skips_malformed_entries() {
        let payload = json!([
            {"documents": [{"text": "a", "section": "b", "question": "c"}]},
            {"course": "c1", "documents": "not-an-array"},
            {"course": "c2", "documents": [
                {"text": "ok", "section": "s", "question": "q"},
                {"text": "missing question", "section": "s"},
                {"text": 42, "section": "s", "question": "q"},
                "not-an-object"
            ]}
        ]);

        let docs = flatten_corpus(&payload).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "ok");
    }

    #[test]
    fn test_flatten_rejects_non_array() {
        let result = flatten_corpus(&json!({"course": "c1"}));
        assert!(matches!(result, Err(AppError::Corpus(_))));
    }

    #[test]
    fn test_source_for_location() {
        assert!(source_for("https://example.com/documents.json")
            .unwrap()
            .describe()
            .starts_with("https://"));
        assert_eq!(
            source_for("./documents.json").unwrap().describe(),
            "./documents.json"
        );
    }

    #[tokio::test]
    async fn test_file_corpus_fetch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"course": "c1", "documents": [{{"text": "t", "section": "s", "question": "q"}}]}}]"#
        )
        .unwrap();

        let docs = FileCorpus::new(file.path()).fetch().await.unwrap();
        assert_eq!(docs, vec![Document::new("c1", "s", "q", "t")]);
    }

    #[tokio::test]
    async fn test_file_corpus_missing_file() {
        let result = FileCorpus::new("/nonexistent/documents.json").fetch().await;
        assert!(matches!(result, Err(AppError::Corpus(_))));
    }
}
