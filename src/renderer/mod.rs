//! Page renderer module
//!
//! This module contains the DOM query surface the crawler drives:
//! - The `Renderer` trait and its error type
//! - Generation-tagged node handles
//! - A Chromium backend for live pages
//! - A snapshot backend over static HTML

mod chromium;
mod handle;
mod snapshot;
mod traits;

pub use chromium::ChromiumRenderer;
pub use handle::NodeHandle;
pub use snapshot::SnapshotRenderer;
pub use traits::{Renderer, RendererError, RendererResult, SELECTOR_POLL_INTERVAL};
