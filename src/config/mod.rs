//! Configuration module for Quote-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for the CLI: `Config::default()` carries the
//! same values a blank file would.
//!
//! # Example
//!
//! ```no_run
//! use quote_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, SelectorConfig, SettleMode, TargetConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
