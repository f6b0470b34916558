//! Crawl state definitions for the pagination state machine
//!
//! This module defines the states a crawl session moves through and why a
//! session ended.

use std::fmt;
use thiserror::Error;

/// Why a crawl reached its normal end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoneReason {
    /// The configured page limit was reached
    MaxPagesReached,

    /// A rendered page contained no quote blocks
    NoQuoteBlocks,

    /// The last page had no next-page control
    NoNextPage,
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MaxPagesReached => "maximum page count reached",
            Self::NoQuoteBlocks => "page had no quote blocks",
            Self::NoNextPage => "no next-page control",
        };
        write!(f, "{}", text)
    }
}

/// A move the state machine does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid crawl transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: CrawlState,
    pub to: CrawlState,
}

/// Represents the current state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Waiting for quote blocks to render on the current page
    AwaitingPage,

    /// Pulling records out of the current page
    ExtractingPage,

    /// Deciding whether and how to move to the next page
    AdvancingPage,

    // ===== Terminal States =====
    /// Normal completion
    Done(DoneReason),

    /// The page did not render in time; later pages are unreachable
    Aborted {
        /// 1-based index of the page that timed out
        page: u32,
    },
}

impl CrawlState {
    /// Returns true if no further transitions happen from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Aborted { .. })
    }

    /// Returns true if this is the normal completion state
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns true if the crawl stopped on a render timeout
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    /// Short lowercase name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingPage => "awaiting_page",
            Self::ExtractingPage => "extracting_page",
            Self::AdvancingPage => "advancing_page",
            Self::Done(_) => "done",
            Self::Aborted { .. } => "aborted",
        }
    }

    /// Checks whether moving from this state to `to` is allowed
    pub fn can_transition_to(&self, to: CrawlState) -> bool {
        use CrawlState::*;
        matches!(
            (self, to),
            (AwaitingPage, ExtractingPage)
                | (AwaitingPage, Aborted { .. })
                | (ExtractingPage, AdvancingPage)
                | (ExtractingPage, Done(_))
                | (AdvancingPage, AwaitingPage)
                | (AdvancingPage, Done(_))
        )
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(reason) => write!(f, "done ({})", reason),
            Self::Aborted { page } => write!(f, "aborted (page {} did not render)", page),
            other => write!(f, "{}", other.name()),
        }
    }
}
