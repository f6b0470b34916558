//! Chromium renderer backed by chromiumoxide
//!
//! This module drives a real Chrome/Chromium instance over the DevTools
//! protocol:
//! - Launching a headless browser (or attaching to a remote one)
//! - Running the CDP event handler on its own task
//! - Resolving CSS queries to elements on the single session page
//! - Clicking through injected script
//! - Tearing the browser down on close

use crate::config::BrowserConfig;
use crate::renderer::handle::NodeArena;
use crate::renderer::{NodeHandle, Renderer, RendererError, RendererResult};
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig as LaunchConfig, Page};
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Script used for clicks; avoids pointer hit-testing against overlays
const CLICK_SCRIPT: &str = "function() { this.click(); }";

/// Renderer that drives a Chromium browser session
pub struct ChromiumRenderer {
    config: BrowserConfig,
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    nodes: NodeArena<Element>,
}

impl ChromiumRenderer {
    /// Creates a renderer; the browser is started by [`Renderer::open`]
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            config: config.clone(),
            browser: None,
            page: None,
            handler_task: None,
            nodes: NodeArena::new(),
        }
    }

    /// Builds the launch configuration
    ///
    /// Headless, no GPU, no sandbox, and Chrome's own logging reduced to fatal.
    fn launch_config(&self) -> RendererResult<LaunchConfig> {
        let mut builder = LaunchConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.config.request_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--log-level=3");

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(RendererError::Launch)
    }

    /// Launches or connects to the browser and spawns its event handler
    async fn start_browser(&mut self) -> RendererResult<Browser> {
        let (browser, handler) = if let Some(ref url) = self.config.remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.clone())
                .await
                .map_err(|e| RendererError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            tracing::debug!("Launching headless Chrome");
            Browser::launch(self.launch_config()?)
                .await
                .map_err(|e| RendererError::Launch(e.to_string()))?
        };

        self.handler_task = Some(tokio::spawn(async move {
            let skipped = drive_handler(handler).await;
            tracing::debug!("CDP connection closed ({} undecodable messages)", skipped);
        }));

        Ok(browser)
    }

    fn page(&self) -> RendererResult<&Page> {
        self.page.as_ref().ok_or(RendererError::NotOpen)
    }

    fn register_all(&mut self, elements: Vec<Element>) -> Vec<NodeHandle> {
        elements
            .into_iter()
            .map(|element| self.nodes.register(element))
            .collect()
    }
}

/// Polls the CDP handler until the connection closes
///
/// A message that fails to decode is logged and skipped; the connection
/// stays usable. Returns how many messages were skipped.
async fn drive_handler<H, T, E>(mut handler: H) -> usize
where
    H: Stream<Item = Result<T, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut skipped = 0;
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            skipped += 1;
            tracing::debug!("Skipping CDP message: {}", e);
        }
    }
    skipped
}

fn engine_error(e: chromiumoxide::error::CdpError) -> RendererError {
    RendererError::Engine(e.to_string())
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open(&mut self, url: &str) -> RendererResult<()> {
        if self.browser.is_none() {
            let browser = self.start_browser().await?;
            self.browser = Some(browser);
        }

        let browser = self.browser.as_ref().ok_or(RendererError::NotOpen)?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RendererError::Launch(format!("Failed to create page: {}", e)))?;

        // goto waits for the load event
        let navigation = page.goto(url).await.map(|_| ());
        if let Err(e) = navigation {
            if let Err(close_err) = page.close().await {
                tracing::debug!("Failed to close page after navigation error: {}", close_err);
            }
            return Err(RendererError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            });
        }

        self.nodes.invalidate();
        if let Some(previous) = self.page.replace(page) {
            if let Err(e) = previous.close().await {
                tracing::debug!("Failed to close previous page: {}", e);
            }
        }

        tracing::debug!("Navigated to {} (generation {})", url, self.nodes.generation());
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> RendererResult<Vec<NodeHandle>> {
        let elements = self
            .page()?
            .find_elements(selector)
            .await
            .map_err(engine_error)?;
        Ok(self.register_all(elements))
    }

    async fn find_children(
        &mut self,
        parent: NodeHandle,
        selector: &str,
    ) -> RendererResult<Vec<NodeHandle>> {
        let elements = self
            .nodes
            .resolve(parent)?
            .find_elements(selector)
            .await
            .map_err(engine_error)?;
        Ok(self.register_all(elements))
    }

    async fn node_text(&mut self, node: NodeHandle) -> RendererResult<String> {
        let text = self
            .nodes
            .resolve(node)?
            .inner_text()
            .await
            .map_err(engine_error)?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn click_via_script(&mut self, node: NodeHandle) -> RendererResult<()> {
        self.nodes
            .resolve(node)?
            .call_js_fn(CLICK_SCRIPT, false)
            .await
            .map_err(|e| RendererError::Script(e.to_string()))?;

        // The page re-renders client-side; nothing queried so far is reliable
        self.nodes.invalidate();
        Ok(())
    }

    async fn close(&mut self) {
        self.nodes.invalidate();

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::warn!("Failed to close page: {}", e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            // remote browsers are detached, never closed
            if self.config.remote_debugging_url.is_none() {
                if let Err(e) = browser.close().await {
                    tracing::warn!("Failed to close browser: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    tracing::warn!("Failed waiting for browser exit: {}", e);
                }
            }
        }

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        tracing::debug!("Chromium renderer closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_executable() -> BrowserConfig {
        BrowserConfig {
            chrome_executable: Some("/bin/true".to_string()),
            ..BrowserConfig::default()
        }
    }

    #[test]
    fn test_launch_config_disables_sandbox_gpu_and_logging() {
        let renderer = ChromiumRenderer::new(&config_with_executable());
        let launch = renderer.launch_config().expect("launch config should build");
        let described = format!("{:?}", launch);

        assert!(described.contains("sandbox: false"), "{}", described);
        assert!(described.contains("--disable-gpu"), "{}", described);
        assert!(described.contains("--disable-dev-shm-usage"), "{}", described);
        assert!(described.contains("--log-level=3"), "{}", described);
        assert!(described.contains("headless: true"), "{}", described);
    }

    #[test]
    fn test_launch_config_with_head() {
        let config = BrowserConfig {
            headless: false,
            ..config_with_executable()
        };
        let launch = ChromiumRenderer::new(&config)
            .launch_config()
            .expect("launch config should build");
        assert!(format!("{:?}", launch).contains("headless: false"));
    }

    #[tokio::test]
    async fn test_handler_keeps_running_past_bad_messages() {
        let events: Vec<Result<(), &str>> =
            vec![Err("unknown event"), Ok(()), Err("truncated frame"), Ok(())];

        let skipped = drive_handler(futures::stream::iter(events)).await;
        assert_eq!(skipped, 2);
    }

    /// Needs a local Chrome; run with `cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_failed_navigation_closes_new_tab() {
        let mut renderer = ChromiumRenderer::new(&BrowserConfig::default());
        renderer.open("about:blank").await.expect("blank page opens");
        let before = renderer.browser.as_ref().unwrap().pages().await.unwrap().len();

        let result = renderer.open("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(RendererError::Navigation { .. })));

        let after = renderer.browser.as_ref().unwrap().pages().await.unwrap().len();
        assert_eq!(before, after);
        assert!(renderer.page.is_some());

        renderer.close().await;
    }

    #[tokio::test]
    async fn test_queries_before_open_fail() {
        let mut renderer = ChromiumRenderer::new(&BrowserConfig::default());
        assert!(matches!(
            renderer.query_all(".quote").await,
            Err(RendererError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_close_without_open_is_harmless() {
        let mut renderer = ChromiumRenderer::new(&BrowserConfig::default());
        renderer.close().await;
        assert!(renderer.browser.is_none());
        assert!(renderer.handler_task.is_none());
    }
}
