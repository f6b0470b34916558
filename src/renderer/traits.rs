//! Renderer trait and error types
//!
//! A renderer owns one browser-like session: it loads a page, answers CSS
//! queries against the rendered DOM and performs in-page actions.

use crate::renderer::NodeHandle;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// How often `wait_for_selector` re-checks the DOM
pub const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by a renderer
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout:?} waiting for '{selector}'")]
    Timeout { selector: String, timeout: Duration },

    #[error("No element matching '{selector}'")]
    NotFound { selector: String },

    #[error("Stale node handle from generation {handle_generation} (current generation {current})")]
    StaleHandle { handle_generation: u64, current: u64 },

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Browser engine error: {0}")]
    Engine(String),

    #[error("Renderer is not open")]
    NotOpen,
}

impl RendererError {
    /// Returns true for a wait that ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true for a scoped lookup that matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// DOM query surface over one rendered page session
///
/// Handles returned by the query methods belong to the page generation they
/// were created in. `open` and `click_via_script` start a new generation, after
/// which older handles fail with [`RendererError::StaleHandle`].
#[async_trait]
pub trait Renderer: Send {
    /// Launches the engine if necessary and navigates to `url`
    async fn open(&mut self, url: &str) -> RendererResult<()>;

    /// Waits until at least one node matches `selector`
    ///
    /// The wait yields to the runtime between checks and fails with
    /// [`RendererError::Timeout`] once `timeout` has elapsed.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> RendererResult<()> {
        let poll = async {
            loop {
                if !self.query_all(selector).await?.is_empty() {
                    return Ok::<(), RendererError>(());
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(RendererError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
        }
    }

    /// All nodes currently matching `selector`, in document order
    async fn query_all(&mut self, selector: &str) -> RendererResult<Vec<NodeHandle>>;

    /// First descendant of `parent` matching `selector`
    async fn find_child(&mut self, parent: NodeHandle, selector: &str) -> RendererResult<NodeHandle> {
        self.find_children(parent, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RendererError::NotFound {
                selector: selector.to_string(),
            })
    }

    /// All descendants of `parent` matching `selector`, in document order
    async fn find_children(
        &mut self,
        parent: NodeHandle,
        selector: &str,
    ) -> RendererResult<Vec<NodeHandle>>;

    /// Rendered text content of a node, trimmed
    async fn node_text(&mut self, node: NodeHandle) -> RendererResult<String>;

    /// Clicks a node by injecting `this.click()` into the page
    async fn click_via_script(&mut self, node: NodeHandle) -> RendererResult<()>;

    /// Releases the engine. Never fails; problems are logged.
    async fn close(&mut self);
}
