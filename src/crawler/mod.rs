//! Crawler module for listing page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing pages
//! - Players table extraction
//! - Next-page detection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pagination;
mod parser;

pub use coordinator::{crawl, crawl_players, CrawlReport, Crawler};
pub use fetcher::{
    build_http_client, page_url, FetchCause, FetchFailure, FetchedPage, PageFetcher, PAGE_PARAM,
};
pub use pagination::{find_next_link, NextPageSignal};
pub use parser::{extract_players, has_player_rows, CellPolicy, TableScan, PLAYERS_TABLE, PLAYER_ROWS};
