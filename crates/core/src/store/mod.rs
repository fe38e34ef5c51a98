//! Search-count storage.
//!
//! This module provides a `SearchCountStore` trait keeping one record per
//! distinct search term with a running count, plus the "top N terms by count"
//! query behind the trending display. Backends: a remote Appwrite document
//! collection, a local SQLite database, and an in-process map.

mod appwrite;
mod memory;
mod sqlite;

pub use appwrite::AppwriteCountStore;
pub use memory::MemoryCountStore;
pub use sqlite::SqliteCountStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of records returned for the trending display.
pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Errors that can occur when talking to a count store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (remote backends).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse a response or stored value.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Database error (local backends).
    #[error("Database error: {0}")]
    Database(String),

    /// Store not configured (missing collection ids, etc.).
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

/// A persisted per-term search-count entry.
///
/// At most one record exists per distinct term. The term is the logical key;
/// `id` is the backend's document identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    /// Backend document ID.
    pub id: String,
    /// The search term (unique key).
    pub term: String,
    /// How many times the term has been searched (>= 1).
    pub count: i64,
    /// Catalog ID of the top result at first search.
    pub movie_id: u32,
    /// Cached full poster URL of the top result, if it had a poster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// When the term was last searched.
    pub last_searched_at: DateTime<Utc>,
}

/// Data captured when a term is first recorded.
///
/// Existing records keep their original seed; only the count and the
/// last-searched timestamp move on subsequent searches.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSeed {
    /// Catalog ID of the search's top result.
    pub movie_id: u32,
    /// Full poster URL of the top result.
    pub poster_url: Option<String>,
}

/// Trait for search-count storage backends.
#[async_trait]
pub trait SearchCountStore: Send + Sync {
    /// Increment the count for `term`, creating a count-1 record seeded from
    /// `seed` if the term has never been searched. Returns the record as
    /// written.
    ///
    /// Backends implement this as atomically as their storage allows; see the
    /// backend docs for which ones can lose increments under concurrency.
    async fn increment_or_insert(
        &self,
        term: &str,
        seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError>;

    /// Look up the record for an exact term, if any.
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError>;

    /// The top `limit` records ordered by count descending. Tie order is
    /// backend-default and must not be relied on.
    async fn top_terms(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError>;
}
