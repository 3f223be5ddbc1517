//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: what happened to a single page (rows, no table, no rows, fetch failed)
//! - `StopReason`: why a whole crawl run ended

mod page_outcome;
mod stop_reason;

// Re-export main types
pub use page_outcome::PageOutcome;
pub use stop_reason::StopReason;
