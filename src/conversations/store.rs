//! SQLite-backed conversation log.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chrono::DateTime;
use thiserror::Error;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::answer::types::Mode;
use crate::conversations::types::Exchange;

/// Boxed future type for store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for conversation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` storage error (sync).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// A stored row could not be mapped back to an exchange.
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
}

/// Convenience result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only storage of exchanges with owner-scoped retrieval.
pub trait ConversationStore: Send + Sync {
    /// Durably append one exchange.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn record(&self, exchange: &Exchange) -> StoreFuture<'_, StoreResult<()>>;

    /// List the owner's exchanges, newest first, capped at `limit`.
    ///
    /// Exchanges with no owner are never returned.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list_by_owner(&self, owner: &str, limit: usize)
        -> StoreFuture<'_, StoreResult<Vec<Exchange>>>;
}

/// Raw row shape read back from `SQLite`.
struct ExchangeRow {
    id: String,
    question: String,
    answer: String,
    mode: String,
    owner: Option<String>,
    created_at_ms: i64,
}

impl ExchangeRow {
    fn into_exchange(self) -> StoreResult<Exchange> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|err| StoreError::InvalidRow(format!("bad exchange id: {err}")))?;
        let created_at = DateTime::from_timestamp_millis(self.created_at_ms).ok_or_else(|| {
            StoreError::InvalidRow(format!("bad timestamp: {}", self.created_at_ms))
        })?;

        Ok(Exchange {
            id,
            question: self.question,
            answer: self.answer,
            mode: Mode::from_param(Some(&self.mode)),
            owner: self.owner,
            created_at,
        })
    }
}

/// `SQLite` implementation of the conversation store.
pub struct SqliteConversationStore {
    conn: Connection,
    table: String,
}

impl SqliteConversationStore {
    /// Table name for exchanges.
    pub const DEFAULT_TABLE: &'static str = "conversations";

    /// Open the database at `path` and create the table if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).await?;
        Self::with_connection(conn).await
    }

    /// Open an in-memory database, for tests.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open(":memory:").await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> StoreResult<Self> {
        let table = Self::DEFAULT_TABLE.to_string();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    id TEXT PRIMARY KEY,
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    mode TEXT NOT NULL DEFAULT 'patient',
                    owner TEXT,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_{table_name}_owner_created
                    ON {table_name} (owner, created_at DESC);"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }

    /// Count every stored exchange, owned or anonymous.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn count_all(&self) -> StoreResult<u64> {
        let table = self.table.clone();
        let count = self
            .conn
            .call(move |conn| {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
                Ok(count)
            })
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl ConversationStore for SqliteConversationStore {
    fn record(&self, exchange: &Exchange) -> StoreFuture<'_, StoreResult<()>> {
        let exchange = exchange.clone();
        Box::pin(async move {
            let table = self.table.clone();
            let id = exchange.id.to_string();
            let mode = exchange.mode.name();
            let created_at = exchange.created_at.timestamp_millis();

            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table} (id, question, answer, mode, owner, created_at)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                        ),
                        rusqlite::params![
                            id,
                            exchange.question,
                            exchange.answer,
                            mode,
                            exchange.owner,
                            created_at
                        ],
                    )?;
                    Ok(())
                })
                .await?;

            Ok(())
        })
    }

    fn list_by_owner(
        &self,
        owner: &str,
        limit: usize,
    ) -> StoreFuture<'_, StoreResult<Vec<Exchange>>> {
        let owner = owner.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);

            let rows = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, question, answer, mode, owner, created_at
                         FROM {table}
                         WHERE owner = ?1
                         ORDER BY created_at DESC, rowid DESC
                         LIMIT ?2"
                    ))?;
                    let rows = stmt
                        .query_map(rusqlite::params![owner, limit], |row| {
                            Ok(ExchangeRow {
                                id: row.get(0)?,
                                question: row.get(1)?,
                                answer: row.get(2)?,
                                mode: row.get(3)?,
                                owner: row.get(4)?,
                                created_at_ms: row.get(5)?,
                            })
                        })?
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(rows)
                })
                .await?;

            rows.into_iter()
                .map(ExchangeRow::into_exchange)
                .collect::<StoreResult<Vec<_>>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};

    fn exchange_at(owner: Option<&str>, offset_secs: i64) -> Exchange {
        let mut exchange = Exchange::new(
            format!("question at {offset_secs}"),
            "an answer",
            Mode::Patient,
            owner.map(str::to_string),
        );
        exchange.created_at = Utc::now() + Duration::seconds(offset_secs);
        exchange
    }

    #[tokio::test]
    async fn test_record_and_list_round_trip() {
        let store = SqliteConversationStore::in_memory().await.unwrap();
        let exchange = Exchange::new(
            "What causes a headache?",
            "Plenty of things.",
            Mode::Doctor,
            Some("user-1".to_string()),
        );

        store.record(&exchange).await.unwrap();
        let listed = store.list_by_owner("user-1", 100).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, exchange.id);
        assert_eq!(listed[0].question, exchange.question);
        assert_eq!(listed[0].mode, Mode::Doctor);
        assert_eq!(listed[0].owner.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = SqliteConversationStore::in_memory().await.unwrap();
        for offset in [-30, -10, -20] {
            store
                .record(&exchange_at(Some("user-1"), offset))
                .await
                .unwrap();
        }

        let listed = store.list_by_owner("user-1", 100).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].created_at >= listed[1].created_at);
        assert!(listed[1].created_at >= listed[2].created_at);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let store = SqliteConversationStore::in_memory().await.unwrap();
        for offset in 0..5 {
            store
                .record(&exchange_at(Some("user-1"), -offset))
                .await
                .unwrap();
        }

        let listed = store.list_by_owner("user-1", 2).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_exchanges_are_excluded() {
        let store = SqliteConversationStore::in_memory().await.unwrap();
        store.record(&exchange_at(None, 0)).await.unwrap();
        store.record(&exchange_at(Some("user-1"), 0)).await.unwrap();

        let listed = store.list_by_owner("user-1", 100).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(store.count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = SqliteConversationStore::in_memory().await.unwrap();
        store.record(&exchange_at(Some("user-1"), 0)).await.unwrap();
        store.record(&exchange_at(Some("user-2"), 0)).await.unwrap();

        let listed = store.list_by_owner("user-2", 100).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].owner.as_deref(), Some("user-2"));
    }
}
