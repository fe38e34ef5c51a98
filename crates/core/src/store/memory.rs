//! In-process count store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{RecordSeed, SearchCountStore, SearchRecord, StoreError};

/// In-memory count store backed by a map keyed on term.
///
/// The upsert runs under a single lock, so counts are exact even with
/// concurrent searches. Everything is lost when the process exits; useful for
/// tests and as a zero-config backend.
#[derive(Debug, Default)]
pub struct MemoryCountStore {
    records: Mutex<HashMap<String, SearchRecord>>,
}

impl MemoryCountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms recorded.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether no term has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl SearchCountStore for MemoryCountStore {
    async fn increment_or_insert(
        &self,
        term: &str,
        seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError> {
        let mut records = self.records.lock().await;
        let record = records
            .entry(term.to_string())
            .and_modify(|r| {
                r.count += 1;
                r.last_searched_at = Utc::now();
            })
            .or_insert_with(|| SearchRecord {
                id: uuid::Uuid::new_v4().to_string(),
                term: term.to_string(),
                count: 1,
                movie_id: seed.movie_id,
                poster_url: seed.poster_url.clone(),
                last_searched_at: Utc::now(),
            });
        Ok(record.clone())
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        Ok(self.records.lock().await.get(term).cloned())
    }

    async fn top_terms(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        let records = self.records.lock().await;
        let mut all: Vec<SearchRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.count.cmp(&a.count));
        all.truncate(limit as usize);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn seed(movie_id: u32) -> RecordSeed {
        RecordSeed {
            movie_id,
            poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", movie_id)),
        }
    }

    #[tokio::test]
    async fn test_first_search_creates_count_one() {
        let store = MemoryCountStore::new();
        let record = store.increment_or_insert("dune", &seed(1)).await.unwrap();

        assert_eq!(record.term, "dune");
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_repeat_search_increments_same_record() {
        let store = MemoryCountStore::new();
        let first = store.increment_or_insert("dune", &seed(1)).await.unwrap();
        let second = store.increment_or_insert("dune", &seed(999)).await.unwrap();

        assert_eq!(second.count, 2);
        assert_eq!(second.id, first.id);
        // The original seed wins; a later search's top result does not
        // overwrite the cached metadata.
        assert_eq!(second.movie_id, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_exact() {
        let store = Arc::new(MemoryCountStore::new());

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.increment_or_insert("dune", &seed(1)).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.find_by_term("dune").await.unwrap().unwrap();
        assert_eq!(record.count, 20);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_top_terms_sorted_and_limited() {
        let store = MemoryCountStore::new();
        for (term, searches) in [("dune", 3), ("alien", 5), ("heat", 1), ("tron", 2)] {
            for _ in 0..searches {
                store.increment_or_insert(term, &seed(1)).await.unwrap();
            }
        }

        let top = store.top_terms(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].term, "alien");
        assert_eq!(top[1].term, "dune");
        assert_eq!(top[2].term, "tron");
    }

    #[tokio::test]
    async fn test_top_terms_empty_store() {
        let store = MemoryCountStore::new();
        assert!(store.top_terms(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_term_exact_match_only() {
        let store = MemoryCountStore::new();
        store.increment_or_insert("dune", &seed(1)).await.unwrap();

        assert!(store.find_by_term("dune").await.unwrap().is_some());
        assert!(store.find_by_term("Dune").await.unwrap().is_none());
        assert!(store.find_by_term("dun").await.unwrap().is_none());
    }
}
