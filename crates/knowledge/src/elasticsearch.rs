//! Elasticsearch backend over the REST API.
//!
//! Endpoints used:
//! - `GET /` (ping)
//! - `HEAD|PUT /{index}`
//! - `PUT /{index}/_doc/{id}`
//! - `POST /{index}/_refresh`
//! - `POST /{index}/_search`
//! - `GET /{index}/_count`

use crate::backend::SearchBackend;
use crate::types::{SchemaOutcome, SearchQuery};
use faq_core::{AppError, AppResult, Document};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ping timeout in seconds; the bootstrap retry loop bounds the total wait.
const PING_TIMEOUT_SECS: u64 = 2;

/// Field boosts for the multi-field match.
const SEARCH_FIELDS: [&str; 3] = ["question^3", "text", "section"];

/// Elasticsearch-backed FAQ index.
#[derive(Debug, Clone)]
pub struct ElasticsearchBackend {
    /// HTTP client for API requests
    client: Client,
    /// Cluster base URL (without trailing slash)
    base_url: String,
    /// Index name
    index: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Document,
}

#[derive(Debug, Deserialize)]
struct AggregationResponse {
    aggregations: Aggregations,
}

#[derive(Debug, Deserialize)]
struct Aggregations {
    courses: TermsAggregation,
}

#[derive(Debug, Deserialize)]
struct TermsAggregation {
    buckets: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
struct Bucket {
    key: String,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

impl ElasticsearchBackend {
    /// Create a backend for `index` on the cluster at `base_url`.
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
        })
    }

    fn index_url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.index, suffix)
    }

    /// Turn a non-success response into an error carrying the body.
    async fn error_from(&self, context: &str, response: Response) -> AppError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return AppError::IndexNotFound(self.index.clone());
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        AppError::Search(format!("{} failed ({}): {}", context, status, body))
    }

    async fn send(&self, context: &str, request: reqwest::RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Search(format!("{} request failed: {}", context, e)))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.error_from(context, response).await)
        }
    }
}

/// Settings and mappings for the FAQ index.
pub fn index_definition() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "text": {"type": "text"},
                "section": {"type": "text"},
                "question": {"type": "text"},
                "course": {"type": "keyword"}
            }
        }
    })
}

/// Query DSL for a FAQ search.
///
/// The course filter sits in `filter` context so it restricts the result
/// set without affecting scores.
pub fn search_body(query: &SearchQuery) -> Value {
    let mut bool_query = json!({
        "must": {
            "multi_match": {
                "query": query.text,
                "fields": SEARCH_FIELDS,
                "type": "best_fields"
            }
        }
    });

    if let Some(course) = &query.course_filter {
        bool_query["filter"] = json!({"term": {"course": course}});
    }

    json!({
        "size": query.size,
        "query": {"bool": bool_query}
    })
}

/// Zero-hit terms aggregation over `course`.
pub fn courses_body(limit: usize) -> Value {
    json!({
        "size": 0,
        "aggs": {
            "courses": {
                "terms": {"field": "course", "size": limit}
            }
        }
    })
}

fn is_already_exists(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["type"].as_str().map(str::to_string))
        .map(|t| t == "resource_already_exists_exception")
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl SearchBackend for ElasticsearchBackend {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    fn index_name(&self) -> &str {
        &self.index
    }

    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn ping(&self) -> bool {
        match self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ping failed: {}", e);
                false
            }
        }
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn index_exists(&self) -> AppResult<bool> {
        let response = self
            .client
            .head(self.index_url(""))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Index lookup request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(AppError::Search(format!(
                "Index lookup failed ({})",
                status
            ))),
        }
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn create_index(&self) -> AppResult<SchemaOutcome> {
        let response = self
            .client
            .put(self.index_url(""))
            .json(&index_definition())
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Create index request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(SchemaOutcome::Created);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::BAD_REQUEST && is_already_exists(&body) {
            debug!("Index created concurrently by another caller");
            return Ok(SchemaOutcome::AlreadyExists);
        }

        Err(AppError::Search(format!(
            "Create index failed ({}): {}",
            status, body
        )))
    }

    async fn upsert_document(&self, id: u64, document: &Document) -> AppResult<()> {
        let request = self
            .client
            .put(self.index_url(&format!("/_doc/{}", id)))
            .json(document);
        self.send("Index document", request).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn refresh(&self) -> AppResult<()> {
        let request = self.client.post(self.index_url("/_refresh"));
        self.send("Refresh", request).await?;
        Ok(())
    }

    #[instrument(skip(self, query), fields(index = %self.index, course = ?query.course_filter))]
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Document>> {
        let body = search_body(query);
        debug!("Search body: {}", body);

        let request = self.client.post(self.index_url("/_search")).json(&body);
        let response: SearchResponse = self
            .send("Search", request)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        Ok(response.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn course_terms(&self, limit: usize) -> AppResult<Vec<String>> {
        let request = self
            .client
            .post(self.index_url("/_search"))
            .json(&courses_body(limit));
        let response: AggregationResponse = self
            .send("Course aggregation", request)
            .await?
            .json()
            .await
            .map_err(|e| {
                AppError::Search(format!("Failed to parse aggregation response: {}", e))
            })?;

        Ok(response
            .aggregations
            .courses
            .buckets
            .into_iter()
            .map(|bucket| bucket.key)
            .collect())
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn count(&self) -> AppResult<u64> {
        let request = self.client.get(self.index_url("/_count"));
        let response: CountResponse = self
            .send("Count", request)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse count response: {}", e)))?;

        Ok(response.count)
    }
}
