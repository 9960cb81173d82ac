//! SQLite-backed layout store

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_sqlite::rusqlite::OptionalExtension;
use async_trait::async_trait;
use chrono::Utc;

use super::LayoutStore;
use crate::error::StoreError;

/// A persistent layout store backed by SQLite.
///
/// Records live in a single `layouts` table keyed by storage key. File
/// databases use WAL journal mode.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::store::SqliteStore;
///
/// let store = SqliteStore::open("layouts.db").await?;
///
/// // In-memory database (for testing)
/// let store = SqliteStore::open_in_memory().await?;
/// ```
pub struct SqliteStore {
    client: Client,
}

impl SqliteStore {
    /// Opens a store at the specified path.
    ///
    /// Creates the database file and table if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    /// Opens an in-memory store. Records are lost when it is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    async fn init_schema(client: &Client) -> Result<(), StoreError> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS layouts (
                        key TEXT PRIMARY KEY,
                        data BLOB NOT NULL,
                        updated_at INTEGER NOT NULL
                    )",
                    [],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Returns all stored keys in ascending order.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let keys = self
            .client
            .conn(|conn| {
                let mut stmt = conn.prepare("SELECT key FROM layouts ORDER BY key")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;
        Ok(keys)
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> Result<usize, StoreError> {
        let count = self
            .client
            .conn(|conn| conn.query_row("SELECT COUNT(*) FROM layouts", [], |row| row.get::<_, i64>(0)))
            .await?;
        Ok(count as usize)
    }

    /// Returns `true` if no records are stored.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().await.map(|len| len == 0)
    }
}

#[async_trait]
impl LayoutStore for SqliteStore {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = key.to_string();

        let data = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT data FROM layouts WHERE key = ?",
                    [key],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await?;
        Ok(data)
    }

    async fn set_bytes(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        let key = key.to_string();
        let updated_at = Utc::now().timestamp();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO layouts (key, data, updated_at) VALUES (?, ?, ?)",
                    rusqlite::params![key, data, updated_at],
                )
            })
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM layouts WHERE key = ?", [key]))
            .await?;
        Ok(())
    }
}
