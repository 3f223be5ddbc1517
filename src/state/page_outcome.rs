//! Page outcome definitions for the crawl state machine
//!
//! Every page the crawl loop attempts ends in exactly one of these outcomes.
use std::fmt;

/// What fetching and reading one listing page produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// The players table had at least one data row
    HasRows,

    // ===== End-of-data =====
    /// The page has no players table
    NoTable,

    /// The players table exists but its body has no rows
    NoRows,

    // ===== Failure =====
    /// The page could not be fetched (status, timeout, connection)
    FetchFailed,
}

impl PageOutcome {
    /// Returns true if the loop may move on to the next page
    pub fn can_continue(&self) -> bool {
        matches!(self, Self::HasRows)
    }

    /// Returns true if this outcome marks the end of the listing
    ///
    /// End-of-data is the expected way for a crawl to finish and is not an error.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::NoTable | Self::NoRows)
    }

    /// Returns true if this outcome is a fetch failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }

    /// Short lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasRows => "has_rows",
            Self::NoTable => "no_table",
            Self::NoRows => "no_rows",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all possible page outcomes
    pub fn all() -> [Self; 4] {
        [Self::HasRows, Self::NoTable, Self::NoRows, Self::FetchFailed]
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
