//! Mock catalog for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogMovie, MovieCatalog};

/// A recorded catalog fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedFetch {
    /// The popular/discover listing was fetched.
    Discover,
    /// The search listing was fetched with this query.
    Query(String),
}

/// Mock implementation of the `MovieCatalog` trait.
///
/// Provides controllable behavior for testing:
/// - Configurable search and discover results
/// - Recorded fetches for assertions
/// - One-shot error injection and artificial response delays
pub struct MockCatalog {
    /// Results matched against search queries.
    results: Arc<RwLock<Vec<CatalogMovie>>>,
    /// Results returned for the discover listing.
    popular: Arc<RwLock<Vec<CatalogMovie>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, every fetch sleeps this long before answering.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new mock catalog with empty listings.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            popular: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the pool of movies matched against search queries.
    pub async fn set_results(&self, results: Vec<CatalogMovie>) {
        *self.results.write().await = results;
    }

    /// Set the discover/popular listing.
    pub async fn set_popular(&self, popular: Vec<CatalogMovie>) {
        *self.popular.write().await = popular;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every subsequent fetch by `delay` (None to answer immediately).
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    /// Get the recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// How many times the discover listing was fetched.
    pub async fn discover_count(&self) -> usize {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|f| **f == RecordedFetch::Discover)
            .count()
    }

    /// The search queries fetched, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.fetches
            .read()
            .await
            .iter()
            .filter_map(|f| match f {
                RecordedFetch::Query(q) => Some(q.clone()),
                RecordedFetch::Discover => None,
            })
            .collect()
    }

    async fn simulate_latency(&self) {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.simulate_latency().await;

        self.fetches
            .write()
            .await
            .push(RecordedFetch::Query(query.to_string()));

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        // Match by title, every query word case-insensitively.
        let query_lower = query.to_lowercase();
        let results = self
            .results
            .read()
            .await
            .iter()
            .filter(|m| {
                let title = m.title.to_lowercase();
                query_lower
                    .split_whitespace()
                    .all(|word| title.contains(word))
            })
            .cloned()
            .collect();
        Ok(results)
    }

    async fn discover_popular(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.simulate_latency().await;

        self.fetches.write().await.push(RecordedFetch::Discover);

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self.popular.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_search_filters_by_title() {
        let catalog = MockCatalog::new();
        catalog
            .set_results(vec![
                fixtures::movie(1, "Dune", None),
                fixtures::movie(2, "Dune: Part Two", None),
                fixtures::movie(3, "Alien", None),
            ])
            .await;

        let results = catalog.search_movies("dune part").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
    }

    #[tokio::test]
    async fn test_recorded_fetches() {
        let catalog = MockCatalog::new();

        catalog.search_movies("dune").await.unwrap();
        catalog.discover_popular().await.unwrap();

        let fetches = catalog.recorded_fetches().await;
        assert_eq!(
            fetches,
            vec![
                RecordedFetch::Query("dune".to_string()),
                RecordedFetch::Discover,
            ]
        );
        assert_eq!(catalog.discover_count().await, 1);
        assert_eq!(catalog.queries().await, vec!["dune".to_string()]);
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let catalog = MockCatalog::new();
        catalog
            .set_next_error(CatalogError::Refused("nope".to_string()))
            .await;

        assert!(catalog.search_movies("dune").await.is_err());
        assert!(catalog.search_movies("dune").await.is_ok());
    }
}
