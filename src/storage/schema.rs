//! Database schema definitions
//!
//! The quotes relation is shared with the CRUD collaborator, so column names
//! and types here are part of the external contract.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    author TEXT NOT NULL,
    tags TEXT DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author);
"#;

/// Initializes the database schema
///
/// Never drops or alters existing tables.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
