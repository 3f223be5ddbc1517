//! Why a crawl stopped
//!
//! A crawl always ends with records in hand; the [`StopReason`] tells the
//! caller whether it reached the end of the listing, hit its page limit,
//! lost a page to a fetch failure, or was cancelled.

use super::PageOutcome;
use serde::Serialize;
use std::fmt;

/// Terminal state of a crawl run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The page had no players table
    NoTable { page: u32 },

    /// The players table on the page had no rows
    NoRows { page: u32 },

    /// No pagination signal or probe found a page after this one
    LastPage { page: u32 },

    /// The bounded crawl fetched all the pages it was allowed
    PageLimit { max_pages: u32 },

    /// Fetching the page failed; earlier pages are kept
    FetchFailed { page: u32, cause: String },

    /// The crawl was cancelled while working on this page
    Cancelled { page: u32 },
}

impl StopReason {
    /// Builds the stop reason for a page outcome that ends the crawl
    ///
    /// Returns `None` for [`PageOutcome::HasRows`], which never stops the loop
    /// on its own.
    pub fn from_outcome(outcome: PageOutcome, page: u32, cause: Option<String>) -> Option<Self> {
        match outcome {
            PageOutcome::HasRows => None,
            PageOutcome::NoTable => Some(Self::NoTable { page }),
            PageOutcome::NoRows => Some(Self::NoRows { page }),
            PageOutcome::FetchFailed => Some(Self::FetchFailed {
                page,
                cause: cause.unwrap_or_else(|| "unknown".to_string()),
            }),
        }
    }

    /// Returns true when the crawl ran to the end of the listing or its limit
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::NoTable { .. } | Self::NoRows { .. } | Self::LastPage { .. } | Self::PageLimit { .. }
        )
    }

    /// Returns true when a fetch failure truncated the crawl
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Returns true when the crawl was interrupted by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTable { .. } => "no_table",
            Self::NoRows { .. } => "no_rows",
            Self::LastPage { .. } => "last_page",
            Self::PageLimit { .. } => "page_limit",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTable { page } => write!(f, "no players table on page {}", page),
            Self::NoRows { page } => write!(f, "no player rows on page {}", page),
            Self::LastPage { page } => write!(f, "page {} is the last page", page),
            Self::PageLimit { max_pages } => write!(f, "reached page limit of {}", max_pages),
            Self::FetchFailed { page, cause } => {
                write!(f, "fetching page {} failed: {}", page, cause)
            }
            Self::Cancelled { page } => write!(f, "cancelled at page {}", page),
        }
    }
}
