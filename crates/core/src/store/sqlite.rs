//! SQLite-backed count store implementation.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{RecordSeed, SearchCountStore, SearchRecord, StoreError};

/// SQLite-backed count store.
///
/// The upsert is a single `INSERT .. ON CONFLICT DO UPDATE` statement, so the
/// increment-or-insert is atomic: concurrent identical searches cannot produce
/// duplicate records or lost increments.
pub struct SqliteCountStore {
    conn: Mutex<Connection>,
}

impl SqliteCountStore {
    /// Open the store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS search_counts (
                id TEXT PRIMARY KEY,
                term TEXT NOT NULL UNIQUE,
                count INTEGER NOT NULL DEFAULT 1,
                movie_id INTEGER NOT NULL,
                poster_url TEXT,
                last_searched_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_counts_count ON search_counts(count DESC);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SearchRecord> {
        let id: String = row.get(0)?;
        let term: String = row.get(1)?;
        let count: i64 = row.get(2)?;
        let movie_id: u32 = row.get(3)?;
        let poster_url: Option<String> = row.get(4)?;
        let last_searched_at_str: String = row.get(5)?;

        // Use now if the stored timestamp is unparseable (shouldn't happen
        // with valid data).
        let last_searched_at = DateTime::parse_from_rfc3339(&last_searched_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(SearchRecord {
            id,
            term,
            count,
            movie_id,
            poster_url,
            last_searched_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, term, count, movie_id, poster_url, last_searched_at";

#[async_trait]
impl SearchCountStore for SqliteCountStore {
    async fn increment_or_insert(
        &self,
        term: &str,
        seed: &RecordSeed,
    ) -> Result<SearchRecord, StoreError> {
        let conn = self.conn.lock().unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO search_counts (id, term, count, movie_id, poster_url, last_searched_at)
            VALUES (?1, ?2, 1, ?3, ?4, ?5)
            ON CONFLICT(term) DO UPDATE SET
                count = count + 1,
                last_searched_at = excluded.last_searched_at
            "#,
            params![id, term, seed.movie_id, seed.poster_url, now.to_rfc3339()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let record = conn
            .query_row(
                &format!("SELECT {} FROM search_counts WHERE term = ?1", SELECT_COLUMNS),
                params![term],
                Self::row_to_record,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(record)
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {} FROM search_counts WHERE term = ?1", SELECT_COLUMNS),
            params![term],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn top_terms(&self, limit: u32) -> Result<Vec<SearchRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM search_counts ORDER BY count DESC LIMIT ?1",
                SELECT_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let records = stmt
            .query_map(params![limit], Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(records)
    }
}
