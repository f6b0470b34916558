//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{QuoteRecord, RecordId, StoredQuote};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Quote not found: {0}")]
    NotFound(RecordId),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawl pipeline only calls `initialize` and `append`. The remaining
/// operations are the surface the CRUD collaborator works against; they must
/// tolerate rows the pipeline inserted out-of-band.
pub trait Storage {
    /// Ensures the quotes relation exists. Safe to call repeatedly.
    fn initialize(&mut self) -> StorageResult<()>;

    /// Inserts one quote and returns its new identifier
    ///
    /// The write is committed before this returns. No uniqueness is
    /// enforced, so appending the same quote twice yields two rows.
    fn append(&mut self, record: &QuoteRecord) -> StorageResult<RecordId>;

    /// Returns every stored quote, newest first
    fn list(&self) -> StorageResult<Vec<StoredQuote>>;

    /// Gets one quote by ID
    fn get(&self, id: RecordId) -> StorageResult<Option<StoredQuote>>;

    /// Replaces the content of an existing quote
    fn update(&mut self, id: RecordId, record: &QuoteRecord) -> StorageResult<()>;

    /// Removes a quote
    fn delete(&mut self, id: RecordId) -> StorageResult<()>;

    /// Counts stored quotes
    fn count(&self) -> StorageResult<u64>;
}
