//! Output module for crawl results
//!
//! This module handles:
//! - The per-run `CrawlReport` and its printed form
//! - Listing quotes already in the store

mod listing;
pub mod stats;

pub use listing::{print_quotes, write_quotes};
pub use stats::{print_report, CrawlReport};
