//! Storage module for persisting harvested quotes
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Appending freshly extracted quotes
//! - The list/get/update/delete operations the CRUD surface relies on

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::HarvestError;
use std::fmt;
use std::path::Path;

/// Opens a storage database, creating the file and schema if needed
pub fn open_storage(path: &Path) -> Result<SqliteStorage, HarvestError> {
    let mut storage = SqliteStorage::new(path)?;
    storage.initialize()?;
    Ok(storage)
}

/// Separator used when tags are flattened into one column
pub const TAG_SEPARATOR: &str = ",";

/// Identifier assigned by the store on insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quote extracted from one rendered block, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    /// Tags in document order
    pub tags: Vec<String>,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }

    /// Tags as stored: joined in order, no sorting or dedup
    pub fn joined_tags(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }
}

/// A quote as read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuote {
    pub id: RecordId,
    pub text: String,
    pub author: String,
    pub tags: String,
}

impl StoredQuote {
    /// Splits the stored tag column back into individual tags
    pub fn tag_list(&self) -> Vec<&str> {
        if self.tags.is_empty() {
            return Vec::new();
        }
        self.tags.split(TAG_SEPARATOR).collect()
    }
}
