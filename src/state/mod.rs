//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: position in the pagination state machine
//! - `DoneReason`: why a crawl finished normally
//! - `CrawlSession`: page cursor and state for one run

mod crawl_state;
mod session;

// Re-export main types
pub use crawl_state::{CrawlState, DoneReason, InvalidTransition};
pub use session::CrawlSession;
