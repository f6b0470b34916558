//! Crawl runner
//!
//! Owns the run lifecycle: store initialization, renderer acquisition, the
//! pagination controller, and renderer release. The renderer is closed
//! exactly once on every path out of a run, including a panic inside the
//! controller.

use crate::config::Config;
use crate::crawler::pagination::PaginationController;
use crate::output::CrawlReport;
use crate::renderer::{ChromiumRenderer, Renderer};
use crate::state::CrawlState;
use crate::storage::{open_storage, Storage};
use crate::HarvestError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::Instant;

/// Runs crawls against one store
pub struct CrawlRunner<S: Storage> {
    config: Config,
    storage: S,
}

impl<S: Storage> CrawlRunner<S> {
    pub fn new(config: Config, storage: S) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Runs one crawl with `renderer`
    ///
    /// Only a store initialization failure is returned as an error, and in
    /// that case the renderer is never opened. Renderer failures and state
    /// machine violations end the run early and are recorded in the returned
    /// report.
    pub async fn run<R>(&mut self, renderer: &mut R) -> Result<CrawlReport, HarvestError>
    where
        R: Renderer + ?Sized,
    {
        let start = Instant::now();
        self.storage.initialize()?;

        let mut report = CrawlReport::new();
        tracing::info!(
            "Starting crawl of {} (max {} pages)",
            self.config.target.url,
            self.config.crawler.max_pages
        );

        let outcome = AssertUnwindSafe(Self::drive(
            &self.config,
            &mut self.storage,
            &mut *renderer,
            &mut report,
        ))
        .catch_unwind()
        .await;

        renderer.close().await;
        report.elapsed = start.elapsed();

        match outcome {
            Ok(Ok(state)) => {
                tracing::info!(
                    "Crawl finished: {} ({} quotes from {} pages)",
                    state,
                    report.records_stored,
                    report.pages_processed
                );
                report.final_state = Some(state);
            }
            Ok(Err(e)) => {
                tracing::error!(critical = true, "Crawl stopped by fatal error: {}", e);
                report.failure = Some(e.to_string());
            }
            Err(panic) => {
                tracing::error!(critical = true, "Crawl panicked, renderer released");
                std::panic::resume_unwind(panic);
            }
        }

        Ok(report)
    }

    async fn drive<R>(
        config: &Config,
        storage: &mut S,
        renderer: &mut R,
        report: &mut CrawlReport,
    ) -> Result<CrawlState, HarvestError>
    where
        R: Renderer + ?Sized,
    {
        renderer.open(&config.target.url).await?;

        let controller = PaginationController::new(&config.crawler, &config.selectors);
        controller.run(renderer, storage, report).await
    }
}

/// Runs a complete crawl with a Chromium renderer
///
/// Opens (and if needed creates) the configured database, launches the
/// browser, and crawls the target listing.
pub async fn run_crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let mut renderer = ChromiumRenderer::new(&config.browser);

    let mut runner = CrawlRunner::new(config, storage);
    runner.run(&mut renderer).await
}
