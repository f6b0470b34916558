//! Quote-Harvest: a paginated quote scraper
//!
//! This crate drives a headless browser through a client-rendered listing,
//! extracts quote blocks from each rendered page and appends them to a SQLite
//! store that an external CRUD surface reads from.

pub mod config;
pub mod crawler;
pub mod output;
pub mod renderer;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Quote-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] renderer::RendererError),

    #[error("Crawl state error: {0}")]
    State(#[from] state::InvalidTransition),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Quote-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlRunner};
pub use output::CrawlReport;
pub use renderer::{ChromiumRenderer, NodeHandle, Renderer, RendererError, SnapshotRenderer};
pub use state::{CrawlState, DoneReason, InvalidTransition};
pub use storage::{QuoteRecord, RecordId, SqliteStorage, Storage, StorageError, StoredQuote};
