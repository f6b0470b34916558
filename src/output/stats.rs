//! Crawl report accumulated during a run
//!
//! The report is handed to the pagination controller by `&mut` and filled in
//! as pages are processed, so outcomes can be inspected without reading logs.

use crate::state::CrawlState;
use std::time::Duration;

/// Outcome counters for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Pages whose blocks were extracted
    pub pages_processed: u32,

    /// Quote blocks found across all pages
    pub blocks_seen: u64,

    /// Records committed to the store
    pub records_stored: u64,

    /// Blocks dropped because a required field was missing
    pub blocks_skipped: u64,

    /// Records extracted but rejected by the store
    pub write_failures: u64,

    /// Terminal state of the pagination controller, if it ran to one
    pub final_state: Option<CrawlState>,

    /// Renderer failure that ended the run early
    pub failure: Option<String>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the run reached `Done` without a renderer failure
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.final_state.map_or(false, |s| s.is_done())
    }

    /// Records stored per page processed
    pub fn records_per_page(&self) -> f64 {
        if self.pages_processed == 0 {
            return 0.0;
        }
        self.records_stored as f64 / self.pages_processed as f64
    }
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Quote-Harvest Crawl Report ===\n");

    match (&report.final_state, &report.failure) {
        (_, Some(failure)) => println!("Outcome:          failed ({})", failure),
        (Some(state), None) => println!("Outcome:          {}", state),
        (None, None) => println!("Outcome:          not started"),
    }

    println!("Pages processed:  {}", report.pages_processed);
    println!("Blocks seen:      {}", report.blocks_seen);
    println!("Records stored:   {}", report.records_stored);
    println!("Blocks skipped:   {}", report.blocks_skipped);
    println!("Write failures:   {}", report.write_failures);
    println!("Records per page: {:.1}", report.records_per_page());
    println!("Elapsed:          {:.2?}", report.elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DoneReason;

    #[test]
    fn test_new_report_is_not_success() {
        let report = CrawlReport::new();
        assert!(!report.is_success());
        assert_eq!(report.records_per_page(), 0.0);
    }

    #[test]
    fn test_success_requires_done_without_failure() {
        let mut report = CrawlReport::new();
        report.final_state = Some(CrawlState::Done(DoneReason::NoNextPage));
        assert!(report.is_success());

        report.failure = Some("engine crashed".to_string());
        assert!(!report.is_success());

        report.failure = None;
        report.final_state = Some(CrawlState::Aborted { page: 1 });
        assert!(!report.is_success());
    }

    #[test]
    fn test_records_per_page() {
        let report = CrawlReport {
            pages_processed: 2,
            records_stored: 19,
            ..CrawlReport::default()
        };
        assert!((report.records_per_page() - 9.5).abs() < f64::EPSILON);
    }
}
