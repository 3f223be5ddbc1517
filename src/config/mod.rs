//! Configuration module for pesdb-scrape
//!
//! The crawler runs without any configuration; every value has a default.
//! A TOML file may override any subset of them.
//!
//! # Example
//!
//! ```no_run
//! use pesdb_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pesdb.toml")).unwrap();
//! println!("Delay between pages: {}ms", config.crawler.page_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
