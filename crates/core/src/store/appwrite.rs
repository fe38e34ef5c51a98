//! Appwrite document-store count backend.
//!
//! Talks to an Appwrite database collection over its REST API: list with an
//! equality filter on `term`, create document, patch document by id.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::AppwriteConfig;

use super::{RecordSeed, SearchCountStore, SearchRecord, StoreError};

/// Appwrite-backed count store.
///
/// The REST API has no conditional counter update, so `increment_or_insert`
/// is a read-modify-write: concurrent identical searches can race and produce
/// duplicate records or lost increments. Counts from this backend are
/// approximate.
pub struct AppwriteCountStore {
    client: Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: String,
}

impl AppwriteCountStore {
    /// Create a new Appwrite count store from configuration.
    pub fn new(config: &AppwriteConfig) -> Result<Self, StoreError> {
        for (name, value) in [
            ("project_id", &config.project_id),
            ("database_id", &config.database_id),
            ("collection_id", &config.collection_id),
            ("api_key", &config.api_key),
        ] {
            if value.is_empty() {
                return Err(StoreError::NotConfigured(format!(
                    "Appwrite {} is required",
                    name
                )));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url(), urlencoding::encode(id))
    }

    /// Build a list URL with the given Appwrite query strings.
    fn list_url(&self, queries: &[String]) -> String {
        let mut url = self.documents_url();
        for (i, query) in queries.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&format!("queries[]={}", urlencoding::encode(query)));
        }
        url
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }

    async fn create(&self, term: &str, seed: &RecordSeed) -> Result<SearchRecord, StoreError> {
        let document_id = uuid::Uuid::new_v4().to_string();
        let body = json!({
            "documentId": document_id,
            "data": {
                "term": term,
                "count": 1,
                "movie_id": seed.movie_id,
                "poster_url": seed.poster_url,
                "last_searched_at": Utc::now().to_rfc3339(),
            }
        });

        debug!(term = term, "Creating search-count document");
        let response = self
            .request(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let document: Document = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("Failed to parse document: {}", e)))?;
        Ok(document.into())
    }

    async fn bump(&self, record: &SearchRecord) -> Result<SearchRecord, StoreError> {
        let body = json!({
            "data": {
                "count": record.count + 1,
                "last_searched_at": Utc::now().to_rfc3339(),
            }
        });

        debug!(term = %record.term, count = record.count + 1, "Updating search-count document");
        let response = self
            .request(self.client.patch(self.document_url(&record.id)))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let document: Document = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("Failed to parse document: {}", e)))?;
        Ok(document.into())
    }

    async fn list(&self, queries: &[String]) -> Result<Vec<SearchRecord>, StoreError> {
        let url = self.list_url(queries);
        let response = self.request(self.client.get(&url)).send().await?;
        let response = Self::check_status(response).await?;

        let listing: DocumentList = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("Failed to parse document list: {}", e)))?;

        Ok(listing.documents.into_iter().map(|d| d.into()).collect())
    }
}

/// The `equal("term", [..])` query for an exact term match.
fn equal_term_query(term: &str) -> String {
    // serde_json string encoding doubles as the quoting Appwrite expects.
    format!(
        "equal(\"term\", [{}])",
        serde_json::to_string(term).unwrap_or_default()
    )
}

#[async_trait]
impl SearchCountStore for AppwriteCountStore {
    async fn increment_or_insert(
        &self,
        term: &str,
        seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError> {
        match self.find_by_term(term).await? {
            Some(existing) => self.bump(&existing).await,
            None => self.create(term, seed).await,
        }
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        let records = self.list(&[equal_term_query(term)]).await?;
        Ok(records.into_iter().next())
    }

    async fn top_terms(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        self.list(&[
            "orderDesc(\"count\")".to_string(),
            format!("limit({})", limit),
        ])
        .await
    }
}

// ============================================================================
// Appwrite API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    term: String,
    count: i64,
    movie_id: u32,
    #[serde(default)]
    poster_url: Option<String>,
    #[serde(default)]
    last_searched_at: Option<String>,
}

impl From<Document> for SearchRecord {
    fn from(d: Document) -> Self {
        let last_searched_at = d
            .last_searched_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Self {
            id: d.id,
            term: d.term,
            count: d.count,
            movie_id: d.movie_id,
            poster_url: d.poster_url,
            last_searched_at,
        }
    }
}
