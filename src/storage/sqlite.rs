//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{QuoteRecord, RecordId, StoredQuote};
use crate::HarvestError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`
    ///
    /// The schema is not touched here; call [`Storage::initialize`] before use.
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        // FULL sync: an acknowledged append survives a crash right after it
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database with the schema already in place
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_quote(row: &Row<'_>) -> rusqlite::Result<StoredQuote> {
        Ok(StoredQuote {
            id: RecordId(row.get(0)?),
            text: row.get(1)?,
            author: row.get(2)?,
            tags: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        })
    }
}

fn check_required_fields(record: &QuoteRecord) -> StorageResult<()> {
    if record.text.is_empty() || record.author.is_empty() {
        return Err(StorageError::Database(
            "quote text and author must be non-empty".to_string(),
        ));
    }
    Ok(())
}

impl Storage for SqliteStorage {
    fn initialize(&mut self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    fn append(&mut self, record: &QuoteRecord) -> StorageResult<RecordId> {
        check_required_fields(record)?;

        // Autocommit: the insert is durable once execute returns
        self.conn.execute(
            "INSERT INTO quotes (text, author, tags) VALUES (?1, ?2, ?3)",
            params![record.text, record.author, record.joined_tags()],
        )?;
        Ok(RecordId(self.conn.last_insert_rowid()))
    }

    fn list(&self) -> StorageResult<Vec<StoredQuote>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, text, author, tags FROM quotes ORDER BY id DESC")?;

        let quotes = stmt
            .query_map([], Self::row_to_quote)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(quotes)
    }

    fn get(&self, id: RecordId) -> StorageResult<Option<StoredQuote>> {
        let quote = self
            .conn
            .query_row(
                "SELECT id, text, author, tags FROM quotes WHERE id = ?1",
                params![id.0],
                Self::row_to_quote,
            )
            .optional()?;

        Ok(quote)
    }

    fn update(&mut self, id: RecordId, record: &QuoteRecord) -> StorageResult<()> {
        check_required_fields(record)?;
        let changed = self.conn.execute(
            "UPDATE quotes SET text = ?1, author = ?2, tags = ?3 WHERE id = ?4",
            params![record.text, record.author, record.joined_tags(), id.0],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> StorageResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quotes WHERE id = ?1", params![id.0])?;

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
