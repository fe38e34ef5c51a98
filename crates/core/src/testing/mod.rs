//! Testing utilities and mock implementations.
//!
//! Mock catalog and store helpers so the search flow can be tested without a
//! real catalog API or document store.

mod mock_catalog;

pub use mock_catalog::{MockCatalog, RecordedFetch};

use async_trait::async_trait;

use crate::store::{RecordSeed, SearchCountStore, SearchRecord, StoreError};

/// A count store whose every operation fails, for exercising error paths.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl SearchCountStore for FailingStore {
    async fn increment_or_insert(
        &self,
        _term: &str,
        _seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError> {
        Err(StoreError::Database("injected failure".to_string()))
    }

    async fn find_by_term(&self, _term: &str) -> Result<Option<SearchRecord>, StoreError> {
        Err(StoreError::Database("injected failure".to_string()))
    }

    async fn top_terms(&self, _limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        Err(StoreError::Database("injected failure".to_string()))
    }
}

/// A count store wrapper that delays upserts of one term, for exercising
/// races between slow count recording and newer searches.
pub struct SlowStore {
    inner: std::sync::Arc<dyn SearchCountStore>,
    term: String,
    delay: std::time::Duration,
}

impl SlowStore {
    /// Delay every `increment_or_insert` of `term` by `delay`; other terms
    /// and all reads pass straight through to `inner`.
    pub fn new(
        inner: std::sync::Arc<dyn SearchCountStore>,
        term: impl Into<String>,
        delay: std::time::Duration,
    ) -> Self {
        Self {
            inner,
            term: term.into(),
            delay,
        }
    }
}

#[async_trait]
impl SearchCountStore for SlowStore {
    async fn increment_or_insert(
        &self,
        term: &str,
        seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError> {
        if term == self.term {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.increment_or_insert(term, seed).await
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        self.inner.find_by_term(term).await
    }

    async fn top_terms(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        self.inner.top_terms(limit).await
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogMovie;
    use crate::store::RecordSeed;

    /// Create a test catalog movie with reasonable defaults.
    pub fn movie(id: u32, title: &str, poster_path: Option<&str>) -> CatalogMovie {
        CatalogMovie {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some("2021-09-15".to_string()),
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            poster_path: poster_path.map(String::from),
            backdrop_path: None,
            popularity: Some(50.0),
            vote_average: Some(7.0),
        }
    }

    /// Create a test record seed.
    pub fn seed(movie_id: u32, poster_url: Option<&str>) -> RecordSeed {
        RecordSeed {
            movie_id,
            poster_url: poster_url.map(String::from),
        }
    }
}
