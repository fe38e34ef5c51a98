//! TMDB (The Movie Database) API client.
//!
//! TMDB v4 access uses a bearer token in the Authorization header.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::CatalogConfig;

use super::types::CatalogMovie;
use super::{CatalogError, MovieCatalog};

/// TMDB API client.
pub struct TmdbCatalog {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl TmdbCatalog {
    /// Create a new TMDB client from catalog configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_token.is_empty() {
            return Err(CatalogError::NotConfigured(
                "Catalog API token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.api_token.clone(),
        })
    }

    /// Build the search endpoint URL with the query percent-encoded.
    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/movie?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Build the discover endpoint URL, sorted by descending popularity.
    fn discover_url(&self) -> String {
        format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
    }

    /// Fetch a movie listing from the given endpoint.
    async fn fetch_listing(&self, url: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(CatalogError::NotConfigured(
                "Invalid catalog API token".to_string(),
            ));
        }
        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let listing: ListingResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse listing response: {}", e))
        })?;

        // Some upstreams answer 200 with an error marker in the body.
        if listing.response.as_deref() == Some("False") {
            return Err(CatalogError::Refused(
                listing
                    .error
                    .unwrap_or_else(|| "Failed to fetch movies".to_string()),
            ));
        }

        Ok(listing.results.into_iter().map(|r| r.into()).collect())
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        debug!("TMDB movie search: query='{}'", query);
        self.fetch_listing(&self.search_url(query)).await
    }

    async fn discover_popular(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
        debug!("TMDB discover popular movies");
        self.fetch_listing(&self.discover_url()).await
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    results: Vec<MovieResult>,
    /// Error marker: "False" when the request failed despite a 2xx status.
    #[serde(rename = "Response")]
    response: Option<String>,
    /// Error message accompanying the marker.
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    id: u32,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    popularity: Option<f32>,
    vote_average: Option<f32>,
}

impl From<MovieResult> for CatalogMovie {
    fn from(r: MovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            original_title: r.original_title,
            release_date: r.release_date,
            overview: r.overview,
            poster_path: r.poster_path,
            backdrop_path: r.backdrop_path,
            popularity: r.popularity,
            vote_average: r.vote_average,
        }
    }
}
