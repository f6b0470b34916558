//! Pagination controller
//!
//! Drives one renderer session through the listing, page by page:
//!
//! - `AwaitingPage`: bounded wait for the first quote block
//! - `ExtractingPage`: extract every block and append it to the store
//! - `AdvancingPage`: click the next-page control and let the page settle
//!
//! A render-wait timeout ends the crawl as `Aborted`. Running out of pages,
//! blocks or next-page controls ends it as `Done`. Any other renderer failure
//! is returned to the caller.

use crate::config::{CrawlerConfig, SelectorConfig, SettleMode};
use crate::crawler::extractor::Extractor;
use crate::output::CrawlReport;
use crate::renderer::{Renderer, RendererError, RendererResult, SELECTOR_POLL_INTERVAL};
use crate::state::{CrawlSession, CrawlState, DoneReason};
use crate::storage::Storage;
use crate::HarvestError;

/// Runs the pagination state machine against one renderer and one store
#[derive(Debug, Clone, Copy)]
pub struct PaginationController<'a> {
    crawler: &'a CrawlerConfig,
    selectors: &'a SelectorConfig,
}

impl<'a> PaginationController<'a> {
    pub fn new(crawler: &'a CrawlerConfig, selectors: &'a SelectorConfig) -> Self {
        Self { crawler, selectors }
    }

    /// Runs until a terminal state is reached
    ///
    /// The renderer must already have the first listing page open. Counters
    /// are accumulated into `report` as pages are processed, so they remain
    /// valid when this returns an error part-way through. A disallowed state
    /// transition ends the run with [`HarvestError::State`].
    pub async fn run<R, S>(
        &self,
        renderer: &mut R,
        storage: &mut S,
        report: &mut CrawlReport,
    ) -> Result<CrawlState, HarvestError>
    where
        R: Renderer + ?Sized,
        S: Storage + ?Sized,
    {
        let mut session = CrawlSession::new(self.crawler.max_pages);

        loop {
            let next = match session.state() {
                CrawlState::AwaitingPage => self.await_page(renderer, &session).await?,
                CrawlState::ExtractingPage => {
                    self.extract_page(renderer, storage, &session, report).await?
                }
                CrawlState::AdvancingPage => self.advance_page(renderer, &session).await?,
                terminal => return Ok(terminal),
            };
            session.transition(next)?;
        }
    }

    async fn await_page<R>(&self, renderer: &mut R, session: &CrawlSession) -> RendererResult<CrawlState>
    where
        R: Renderer + ?Sized,
    {
        let timeout = self.crawler.wait_timeout();
        match renderer.wait_for_selector(&self.selectors.quote, timeout).await {
            Ok(()) => Ok(CrawlState::ExtractingPage),
            Err(e) if e.is_timeout() => {
                tracing::error!("Page {} never rendered any quotes: {}", session.page(), e);
                Ok(CrawlState::Aborted {
                    page: session.page(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn extract_page<R, S>(
        &self,
        renderer: &mut R,
        storage: &mut S,
        session: &CrawlSession,
        report: &mut CrawlReport,
    ) -> RendererResult<CrawlState>
    where
        R: Renderer + ?Sized,
        S: Storage + ?Sized,
    {
        let blocks = renderer.query_all(&self.selectors.quote).await?;
        if blocks.is_empty() {
            tracing::warn!("No quote blocks on page {}, stopping", session.page());
            return Ok(CrawlState::Done(DoneReason::NoQuoteBlocks));
        }

        let extractor = Extractor::new(self.selectors);
        let mut stored = 0u64;

        for block in &blocks {
            report.blocks_seen += 1;

            let Some(record) = extractor.extract(renderer, *block).await else {
                report.blocks_skipped += 1;
                continue;
            };

            match storage.append(&record) {
                Ok(id) => {
                    stored += 1;
                    tracing::debug!("Stored quote {} by {}", id, record.author);
                }
                Err(e) => {
                    report.write_failures += 1;
                    tracing::error!("Failed to store quote by {}: {}", record.author, e);
                }
            }
        }

        report.records_stored += stored;
        report.pages_processed += 1;
        tracing::info!(
            "Page {}: stored {} of {} quote blocks",
            session.page(),
            stored,
            blocks.len()
        );

        Ok(CrawlState::AdvancingPage)
    }

    async fn advance_page<R>(&self, renderer: &mut R, session: &CrawlSession) -> RendererResult<CrawlState>
    where
        R: Renderer + ?Sized,
    {
        if session.at_page_limit() {
            tracing::info!("Reached page limit of {}", session.max_pages());
            return Ok(CrawlState::Done(DoneReason::MaxPagesReached));
        }

        let controls = renderer.query_all(&self.selectors.next_page).await?;
        let Some(next) = controls.first().copied() else {
            tracing::info!("No next-page control after page {}", session.page());
            return Ok(CrawlState::Done(DoneReason::NoNextPage));
        };

        let before = match self.crawler.settle_mode {
            SettleMode::ContentChange => self.first_quote_text(renderer).await?,
            SettleMode::Fixed => None,
        };

        renderer.click_via_script(next).await?;
        tokio::time::sleep(self.crawler.settle_delay()).await;

        if self.crawler.settle_mode == SettleMode::ContentChange {
            self.wait_for_change(renderer, before).await?;
        }

        Ok(CrawlState::AwaitingPage)
    }

    /// Waits for the first quote's text to differ from `before`
    ///
    /// Running out of time is not fatal; the crawl carries on with whatever
    /// has rendered.
    async fn wait_for_change<R>(&self, renderer: &mut R, before: Option<String>) -> RendererResult<()>
    where
        R: Renderer + ?Sized,
    {
        let timeout = self.crawler.wait_timeout();
        let poll = async {
            loop {
                let current = self.first_quote_text(&mut *renderer).await?;
                if current.is_some() && current != before {
                    return Ok::<(), RendererError>(());
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Listing did not change within {:?} of advancing, continuing",
                    timeout
                );
                Ok(())
            }
        }
    }

    async fn first_quote_text<R>(&self, renderer: &mut R) -> RendererResult<Option<String>>
    where
        R: Renderer + ?Sized,
    {
        let blocks = renderer.query_all(&self.selectors.quote).await?;
        let Some(first) = blocks.first().copied() else {
            return Ok(None);
        };

        match renderer.find_child(first, &self.selectors.text).await {
            Ok(node) => renderer.node_text(node).await.map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
