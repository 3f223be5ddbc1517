//! pesdb-scrape: a polite player listing scraper
//!
//! This crate walks the paginated player listing of a sports database site,
//! one page at a time, and turns every row of its players table into a
//! [`PlayerRecord`]. The crawl is best-effort: it stops at the end of the
//! listing, on the first failed fetch, or on cancellation, and always hands
//! back the records collected so far.

pub mod config;
pub mod crawler;
pub mod output;
pub mod player;
pub mod state;

use thiserror::Error;

/// Main error type for pesdb-scrape operations
///
/// The crawl loop itself never fails; these errors come from the edges
/// (configuration, client construction, writing results).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for pesdb-scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, crawl_players, CrawlReport, Crawler};
pub use player::PlayerRecord;
pub use state::{PageOutcome, StopReason};
