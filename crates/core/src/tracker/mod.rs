//! Search-count tracking.
//!
//! `CountTracker` sits between the search flow and the count store: it turns a
//! successful search into a best-effort count upsert, and answers the "top N
//! terms" query behind the trending display.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::CatalogMovie;
use crate::store::{RecordSeed, SearchCountStore, SearchRecord, StoreError};

pub use crate::store::DEFAULT_TRENDING_LIMIT;

/// Tracks per-term search counts in a [`SearchCountStore`].
pub struct CountTracker {
    store: Arc<dyn SearchCountStore>,
    image_base_url: String,
}

impl CountTracker {
    /// Create a tracker over the given store. `image_base_url` is used to
    /// derive the cached poster URL from the top result's poster path.
    pub fn new(store: Arc<dyn SearchCountStore>, image_base_url: impl Into<String>) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
        }
    }

    /// Record one search of `term` whose top result was `top_result`.
    ///
    /// Best-effort: empty terms are skipped, and storage errors are logged
    /// and swallowed. Recording a count must never fail the search that
    /// triggered it.
    pub async fn record_search(&self, term: &str, top_result: &CatalogMovie) {
        if term.is_empty() {
            return;
        }

        let seed = RecordSeed {
            movie_id: top_result.id,
            poster_url: top_result.poster_url(&self.image_base_url),
        };

        match self.store.increment_or_insert(term, &seed).await {
            Ok(record) => {
                debug!(term = term, count = record.count, "Recorded search count");
            }
            Err(e) => {
                warn!(term = term, error = %e, "Failed to record search count");
            }
        }
    }

    /// The top `limit` most-searched terms, ordered by count descending.
    ///
    /// Errors propagate so the caller can show a trending-specific message
    /// instead of silently rendering an empty list.
    pub async fn trending(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        self.store.top_terms(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCountStore;
    use crate::testing::{fixtures, FailingStore};

    fn tracker_with_memory() -> (CountTracker, Arc<MemoryCountStore>) {
        let store = Arc::new(MemoryCountStore::new());
        let tracker = CountTracker::new(
            Arc::clone(&store) as Arc<dyn SearchCountStore>,
            "https://image.tmdb.org/t/p",
        );
        (tracker, store)
    }

    #[tokio::test]
    async fn test_record_search_creates_record_with_poster_url() {
        let (tracker, store) = tracker_with_memory();

        tracker
            .record_search("dune", &fixtures::movie(1, "Dune", Some("/x.jpg")))
            .await;

        let record = store.find_by_term("dune").await.unwrap().unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, 1);
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/x.jpg")
        );
    }

    #[tokio::test]
    async fn test_record_search_skips_empty_term() {
        let (tracker, store) = tracker_with_memory();

        tracker
            .record_search("", &fixtures::movie(1, "Dune", Some("/x.jpg")))
            .await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_record_search_swallows_store_errors() {
        let tracker = CountTracker::new(Arc::new(FailingStore), "https://image.tmdb.org/t/p");

        // Must not panic or propagate anything.
        tracker
            .record_search("dune", &fixtures::movie(1, "Dune", None))
            .await;
    }

    #[tokio::test]
    async fn test_trending_propagates_store_errors() {
        let tracker = CountTracker::new(Arc::new(FailingStore), "https://image.tmdb.org/t/p");

        assert!(tracker.trending(DEFAULT_TRENDING_LIMIT).await.is_err());
    }

    #[tokio::test]
    async fn test_trending_returns_top_terms() {
        let (tracker, _store) = tracker_with_memory();
        for _ in 0..3 {
            tracker
                .record_search("dune", &fixtures::movie(1, "Dune", None))
                .await;
        }
        tracker
            .record_search("alien", &fixtures::movie(2, "Alien", None))
            .await;

        let trending = tracker.trending(DEFAULT_TRENDING_LIMIT).await.unwrap();
        assert_eq!(trending.len(), 2);
        assert_eq!(trending[0].term, "dune");
        assert_eq!(trending[0].count, 3);
    }
}
