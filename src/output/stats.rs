//! Statistics generation from a crawl report
//!
//! This module summarizes a finished crawl for display: how much was
//! collected, how many requests it took, and why the run stopped.

use crate::crawler::CrawlReport;
use crate::state::StopReason;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of player records collected
    pub total_players: usize,

    /// Pages fetched and examined
    pub pages_scraped: u32,

    /// HTTP requests issued, probes included
    pub requests: u32,

    /// Why the crawl ended
    pub stop: StopReason,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: i64,

    /// Player count per position, sorted by position name
    pub players_by_position: BTreeMap<String, usize>,
}

impl CrawlStatistics {
    /// Builds statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut players_by_position = BTreeMap::new();
        for player in &report.players {
            *players_by_position
                .entry(player.position.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_players: report.players.len(),
            pages_scraped: report.pages_scraped,
            requests: report.requests,
            stop: report.stop.clone(),
            elapsed_ms: (report.finished_at - report.started_at).num_milliseconds(),
            players_by_position,
        }
    }
}

/// Renders statistics as human-readable text
pub fn render_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Players collected: {}", stats.total_players);
    let _ = writeln!(out, "  Pages scraped: {}", stats.pages_scraped);
    let _ = writeln!(out, "  HTTP requests: {}", stats.requests);
    let _ = writeln!(
        out,
        "  Duration: {:.1}s",
        stats.elapsed_ms as f64 / 1000.0
    );
    let _ = writeln!(out, "  Stopped: {} ({})", stats.stop.as_str(), stats.stop);

    if !stats.players_by_position.is_empty() {
        let _ = writeln!(out, "\nPlayers by Position:");
        for (position, count) in &stats.players_by_position {
            let percentage = (*count as f64 / stats.total_players as f64) * 100.0;
            let _ = writeln!(out, "  {}: {} ({:.1}%)", position, count, percentage);
        }
    }

    out
}

/// Prints statistics to stderr, keeping stdout free for the JSON output
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", render_statistics(stats));
}
