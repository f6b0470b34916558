use crate::state::{CrawlState, InvalidTransition};

/// Ephemeral bookkeeping for one crawl session
///
/// Holds the page cursor and the current state machine position. Nothing in
/// here is persisted.
#[derive(Debug, Clone)]
pub struct CrawlSession {
    /// 1-based index of the page being worked on
    page: u32,
    max_pages: u32,
    state: CrawlState,
}

impl CrawlSession {
    pub fn new(max_pages: u32) -> Self {
        Self {
            page: 1,
            max_pages,
            state: CrawlState::AwaitingPage,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// True once the page limit leaves no room for another page
    pub fn at_page_limit(&self) -> bool {
        self.page >= self.max_pages
    }

    /// Moves the state machine
    ///
    /// A disallowed transition leaves the session untouched.
    pub fn transition(&mut self, to: CrawlState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(to) {
            return Err(InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::trace!("Crawl state {} -> {}", self.state, to);
        if self.state == CrawlState::AdvancingPage && to == CrawlState::AwaitingPage {
            self.page += 1;
        }
        self.state = to;
        Ok(())
    }
}
