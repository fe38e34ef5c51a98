//! Movie catalog abstraction.
//!
//! This module provides a `MovieCatalog` trait for querying a remote movie
//! catalog API, with a TMDB implementation as the default backend.

mod tmdb;
mod types;

pub use tmdb::TmdbCatalog;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// The API answered 2xx but flagged the request as failed in the body.
    #[error("Catalog refused the request: {0}")]
    Refused(String),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API token, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for movie catalog clients.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search for movies matching a free-text query.
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError>;

    /// Fetch the popular/discover listing (shown when there is no query).
    async fn discover_popular(&self) -> Result<Vec<CatalogMovie>, CatalogError>;
}
