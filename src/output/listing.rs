//! Listing of stored quotes
//!
//! Read-only view over the same relation the CRUD surface manages.

use crate::storage::{Storage, StoredQuote};
use crate::HarvestError;
use std::io::Write;

/// Writes stored quotes, newest first, to `out`
pub fn write_quotes<W: Write>(out: &mut W, quotes: &[StoredQuote]) -> std::io::Result<()> {
    for quote in quotes {
        writeln!(out, "#{} {}", quote.id, quote.text)?;
        writeln!(out, "    - {}", quote.author)?;
        if !quote.tags.is_empty() {
            writeln!(out, "    tags: {}", quote.tag_list().join(", "))?;
        }
    }
    writeln!(out, "\n{} quotes", quotes.len())?;
    Ok(())
}

/// Prints every stored quote to stdout
pub fn print_quotes(storage: &dyn Storage) -> Result<(), HarvestError> {
    let quotes = storage.list()?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_quotes(&mut handle, &quotes)?;
    Ok(())
}
