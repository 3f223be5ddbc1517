//! Output module for crawl results and reports
//!
//! This module handles:
//! - Exporting player records as JSON
//! - Summarizing a crawl run as statistics

mod json;
pub mod stats;

pub use json::{write_players_json, write_players_to_path};
pub use stats::{print_statistics, render_statistics, CrawlStatistics};
