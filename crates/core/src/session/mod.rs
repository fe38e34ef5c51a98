//! Search orchestration.
//!
//! `SearchSession` drives the whole flow a frontend observes: fetch the
//! matching (or popular) movie listing, keep loading/error state, record the
//! search count on success, and hold the trending list. Callers are expected
//! to debounce their input before calling [`SearchSession::search`]; the
//! session itself only guards against stale responses.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogMovie, MovieCatalog};
use crate::store::{SearchRecord, DEFAULT_TRENDING_LIMIT};
use crate::tracker::CountTracker;

/// User-visible message for failed catalog fetches without a specific reason.
pub const SEARCH_ERROR_MESSAGE: &str = "Failed to fetch movies. Please try again later.";

/// User-visible message for failed trending fetches, distinct from the main
/// search error.
pub const TRENDING_ERROR_MESSAGE: &str =
    "An error occurred while fetching trending movies. Please try again later.";

/// What a frontend renders: result list, trending list, and their errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    /// Movies matching the last applied search.
    pub movies: Vec<CatalogMovie>,
    /// Error message for the main listing, if the last applied search failed.
    pub error_message: Option<String>,
    /// Most-searched terms for the trending display.
    pub trending: Vec<SearchRecord>,
    /// Error message for the trending display.
    pub trending_error: Option<String>,
}

/// Whether a `search` call's response made it into the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was the latest issued and was applied to the view.
    Applied,
    /// A newer search was issued while this one was in flight; the response
    /// was discarded.
    Superseded,
}

/// The search orchestrator.
///
/// Each `search` call takes a monotonically increasing generation token; a
/// completion whose token is no longer the latest is discarded without
/// touching the view, so a slow early response can never overwrite a newer
/// result.
pub struct SearchSession {
    catalog: Arc<dyn MovieCatalog>,
    tracker: Arc<CountTracker>,
    generation: AtomicU64,
    loading: AtomicBool,
    view: RwLock<SearchView>,
}

impl SearchSession {
    /// Create a session over a catalog client and a count tracker.
    pub fn new(catalog: Arc<dyn MovieCatalog>, tracker: Arc<CountTracker>) -> Self {
        Self {
            catalog,
            tracker,
            generation: AtomicU64::new(0),
            loading: AtomicBool::new(false),
            view: RwLock::new(SearchView::default()),
        }
    }

    /// Search the catalog and apply the outcome to the view.
    ///
    /// An empty term fetches the popular/discover listing; a non-empty term
    /// fetches the query listing and, on success with at least one result,
    /// records a search count for the top result. Count recording is
    /// best-effort and cannot fail the search. The loading flag spans the
    /// request and is cleared on every exit path of the latest request.
    pub async fn search(&self, term: &str) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = if term.is_empty() {
            self.catalog.discover_popular().await
        } else {
            self.catalog.search_movies(term).await
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer search owns the view and the loading flag now.
            debug!(term = term, "Discarding stale search response");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(movies) => {
                if !term.is_empty() {
                    if let Some(top_result) = movies.first() {
                        self.tracker.record_search(term, top_result).await;
                    }
                }

                // Recording the count awaited above; a newer search may have
                // applied in the meantime. Re-check under the write lock so a
                // stale listing can never land after a newer one.
                let mut view = self.view.write().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(term = term, "Discarding stale search response");
                    return SearchOutcome::Superseded;
                }
                view.error_message = None;
                view.movies = movies;
            }
            Err(e) => {
                warn!(term = term, error = %e, "Movie search failed");
                let message = match e {
                    CatalogError::Refused(reason) => reason,
                    _ => SEARCH_ERROR_MESSAGE.to_string(),
                };

                let mut view = self.view.write().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(term = term, "Discarding stale search response");
                    return SearchOutcome::Superseded;
                }
                view.movies.clear();
                view.error_message = Some(message);
            }
        }

        self.loading.store(false, Ordering::SeqCst);
        SearchOutcome::Applied
    }

    /// Refresh the trending list.
    ///
    /// On failure the trending list is cleared and a trending-specific error
    /// message is set; the main listing is untouched.
    pub async fn load_trending(&self) {
        match self.tracker.trending(DEFAULT_TRENDING_LIMIT).await {
            Ok(records) => {
                let mut view = self.view.write().await;
                view.trending = records;
                view.trending_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch trending searches");
                let mut view = self.view.write().await;
                view.trending.clear();
                view.trending_error = Some(TRENDING_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Whether the latest search request is still in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> SearchView {
        self.view.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCountStore, SearchCountStore};
    use crate::testing::{fixtures, FailingStore, MockCatalog};

    fn session_with(catalog: Arc<MockCatalog>) -> (SearchSession, Arc<MemoryCountStore>) {
        let store = Arc::new(MemoryCountStore::new());
        let tracker = Arc::new(CountTracker::new(
            Arc::clone(&store) as Arc<dyn SearchCountStore>,
            "https://image.tmdb.org/t/p",
        ));
        (SearchSession::new(catalog, tracker), store)
    }

    #[tokio::test]
    async fn test_search_success_populates_view() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_results(vec![fixtures::movie(1, "Dune", Some("/x.jpg"))])
            .await;
        let (session, _store) = session_with(catalog);

        let outcome = session.search("dune").await;

        assert_eq!(outcome, SearchOutcome::Applied);
        let view = session.view().await;
        assert_eq!(view.movies.len(), 1);
        assert_eq!(view.error_message, None);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_search_failure_sets_error_and_clears_list() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_results(vec![fixtures::movie(1, "Dune", None)])
            .await;
        let (session, _store) = session_with(Arc::clone(&catalog));

        session.search("dune").await;
        catalog
            .set_next_error(CatalogError::ApiError {
                status: 500,
                message: "boom".to_string(),
            })
            .await;
        session.search("dune").await;

        let view = session.view().await;
        assert!(view.movies.is_empty());
        assert_eq!(view.error_message.as_deref(), Some(SEARCH_ERROR_MESSAGE));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_search_refused_uses_marker_message() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_next_error(CatalogError::Refused("Movie not found!".to_string()))
            .await;
        let (session, _store) = session_with(catalog);

        session.search("zzzz").await;

        let view = session.view().await;
        assert!(view.movies.is_empty());
        assert_eq!(view.error_message.as_deref(), Some("Movie not found!"));
    }

    #[tokio::test]
    async fn test_search_records_count_for_top_result() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_results(vec![
                fixtures::movie(1, "Dune", Some("/x.jpg")),
                fixtures::movie(2, "Dune: Part Two", Some("/y.jpg")),
            ])
            .await;
        let (session, store) = session_with(catalog);

        session.search("dune").await;

        let record = store.find_by_term("dune").await.unwrap().unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, 1);
    }

    #[tokio::test]
    async fn test_empty_term_fetches_discover_and_records_nothing() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_popular(vec![fixtures::movie(1, "Dune", None)])
            .await;
        let (session, store) = session_with(Arc::clone(&catalog));

        session.search("").await;

        assert!(catalog.discover_count().await >= 1);
        assert!(store.is_empty().await);
        assert_eq!(session.view().await.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_results_record_nothing() {
        let catalog = Arc::new(MockCatalog::new());
        let (session, store) = session_with(catalog);

        session.search("no such movie").await;

        assert!(store.is_empty().await);
        assert_eq!(session.view().await.error_message, None);
    }

    #[tokio::test]
    async fn test_load_trending_success_clears_error() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_results(vec![fixtures::movie(1, "Dune", Some("/x.jpg"))])
            .await;
        let (session, _store) = session_with(catalog);

        session.search("dune").await;
        session.load_trending().await;

        let view = session.view().await;
        assert_eq!(view.trending.len(), 1);
        assert_eq!(view.trending[0].term, "dune");
        assert_eq!(view.trending_error, None);
    }

    #[tokio::test]
    async fn test_load_trending_failure_sets_distinct_error() {
        let catalog = Arc::new(MockCatalog::new());
        let tracker = Arc::new(CountTracker::new(
            Arc::new(FailingStore),
            "https://image.tmdb.org/t/p",
        ));
        let session = SearchSession::new(catalog, tracker);

        session.load_trending().await;

        let view = session.view().await;
        assert!(view.trending.is_empty());
        assert_eq!(view.trending_error.as_deref(), Some(TRENDING_ERROR_MESSAGE));
        // The main listing error is a separate surface.
        assert_eq!(view.error_message, None);
    }
}
