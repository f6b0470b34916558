//! Crawler module for paginated quote extraction
//!
//! This module contains the core crawling logic, including:
//! - Per-block field extraction
//! - The pagination state machine
//! - Run lifecycle and guaranteed renderer release

mod extractor;
mod pagination;
mod runner;

pub use extractor::{ExtractError, Extractor};
pub use pagination::PaginationController;
pub use runner::{run_crawl, CrawlRunner};
