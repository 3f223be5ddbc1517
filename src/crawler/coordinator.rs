//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks the listing one page at a
//! time:
//! - Fetching a page (or reusing the page a lookahead probe already fetched)
//! - Extracting player rows from it
//! - Deciding whether a next page exists
//! - Sleeping the politeness delay before the next fetch
//! - Stopping on end-of-data, fetch failure, page limit or cancellation

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchFailure, FetchedPage, PageFetcher};
use crate::crawler::pagination::{find_next_link, NextPageSignal};
use crate::crawler::parser::{extract_players, has_player_rows, CellPolicy, TableScan};
use crate::player::PlayerRecord;
use crate::state::{PageOutcome, StopReason};
use crate::ScrapeError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything a crawl run produced
///
/// `players` is in page order, then row order within a page. Duplicate rows
/// across pages are kept as the site served them.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub players: Vec<PlayerRecord>,

    /// Pages fetched and examined, the one that ended the listing included
    pub pages_scraped: u32,

    /// HTTP requests issued, lookahead probes included
    pub requests: u32,

    pub stop: StopReason,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Returns true if the run was interrupted by cancellation
    pub fn was_cancelled(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub fn into_players(self) -> Vec<PlayerRecord> {
        self.players
    }
}

/// How the loop decides it has run out of pages
#[derive(Debug, Clone, Copy)]
enum Termination {
    /// Follow pagination signals until they run out
    Pagination,

    /// Stop after a fixed number of pages
    PageLimit(u32),
}

/// Result of the lookahead probe for the page after the current one
enum Probe {
    /// The next page has rows; kept so the loop does not fetch it twice
    Rows(FetchedPage),
    Empty,
    Failed(FetchFailure),
}

/// Per-run accumulator, owned by the loop until it returns
struct RunState {
    players: Vec<PlayerRecord>,
    pages_scraped: u32,
    requests: u32,
    started_at: DateTime<Utc>,
}

impl RunState {
    fn new() -> Self {
        Self {
            players: Vec::new(),
            pages_scraped: 0,
            requests: 0,
            started_at: Utc::now(),
        }
    }

    fn finish(self, stop: StopReason) -> CrawlReport {
        tracing::info!(
            "Total players scraped: {} from {} pages ({})",
            self.players.len(),
            self.pages_scraped,
            stop
        );

        CrawlReport {
            players: self.players,
            pages_scraped: self.pages_scraped,
            requests: self.requests,
            stop,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Sequential listing crawler
///
/// One request is in flight at a time, probes included, and the configured
/// delay separates consecutive pages.
pub struct Crawler {
    fetcher: PageFetcher,
    settings: CrawlerConfig,
}

impl Crawler {
    /// Creates a crawler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(ScrapeError)` - Invalid base URL or the HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let fetcher = PageFetcher::from_config(config)?;
        Ok(Self::with_fetcher(fetcher, config.crawler.clone()))
    }

    pub fn with_fetcher(fetcher: PageFetcher, settings: CrawlerConfig) -> Self {
        Self { fetcher, settings }
    }

    pub fn base_url(&self) -> &Url {
        self.fetcher.base_url()
    }

    /// Crawls the whole listing
    ///
    /// Starts at page 1 and keeps going while pagination says another page
    /// exists. Never fails: on end-of-data, fetch failure or cancellation it
    /// returns what it has collected. A cancelled `cancel` token stays
    /// cancelled so the caller can see the interruption.
    pub async fn run(&self, cancel: &CancellationToken) -> CrawlReport {
        self.run_until(Termination::Pagination, CellPolicy::DataCells, cancel)
            .await
    }

    /// Crawls at most `max_pages` pages
    ///
    /// Pagination links are not consulted; the run ends after `max_pages`
    /// pages or earlier on end-of-data or failure. Header cells count
    /// towards a row's eight columns.
    pub async fn run_bounded(&self, max_pages: u32, cancel: &CancellationToken) -> CrawlReport {
        if max_pages == 0 {
            return RunState::new().finish(StopReason::PageLimit { max_pages });
        }

        self.run_until(Termination::PageLimit(max_pages), CellPolicy::AnyCells, cancel)
            .await
    }

    async fn run_until(
        &self,
        termination: Termination,
        policy: CellPolicy,
        cancel: &CancellationToken,
    ) -> CrawlReport {
        let mut state = RunState::new();
        let mut page: u32 = 1;
        let mut prefetched: Option<FetchedPage> = None;

        tracing::info!("Starting crawl of {}", self.fetcher.base_url());

        loop {
            if cancel.is_cancelled() {
                return self.cancelled(state, page);
            }

            // Fetch the page, or take the one the probe already fetched
            let fetched = match prefetched.take() {
                Some(fetched) => {
                    tracing::debug!("Reusing probed page {}", page);
                    Ok(fetched)
                }
                None => {
                    tracing::info!("Scraping page {}: {}", page, self.fetcher.page_url(page));
                    state.requests += 1;
                    tokio::select! {
                        _ = cancel.cancelled() => return self.cancelled(state, page),
                        result = self.fetcher.fetch(page, self.settings.fetch_timeout()) => result,
                    }
                }
            };

            let (outcome, scan, signal, cause) = match fetched {
                Ok(fetched) => {
                    state.pages_scraped += 1;
                    let (scan, signal) = read_page(&fetched, policy, termination);
                    (scan.outcome(), scan, signal, None)
                }
                Err(failure) => {
                    tracing::warn!("Error scraping page {}: {}", page, failure.cause);
                    let cause = Some(failure.cause.to_string());
                    (PageOutcome::FetchFailed, TableScan::NoTable, None, cause)
                }
            };

            if let Some(stop) = StopReason::from_outcome(outcome, page, cause) {
                if outcome.is_end_of_data() {
                    tracing::info!("Reached end of listing: {}", stop);
                }
                return state.finish(stop);
            }

            tracing::info!("Scraped {} players from page {}", scan.row_count(), page);
            state.players.extend(scan.into_records());

            match termination {
                Termination::PageLimit(max_pages) => {
                    if page >= max_pages {
                        return state.finish(StopReason::PageLimit { max_pages });
                    }
                }
                Termination::Pagination => {
                    let signal = match signal {
                        Some(signal) => Some(signal),
                        None => {
                            state.requests += 1;
                            let probe = tokio::select! {
                                _ = cancel.cancelled() => return self.cancelled(state, page + 1),
                                probe = self.probe(page + 1) => probe,
                            };
                            match probe {
                                Probe::Rows(next) => {
                                    prefetched = Some(next);
                                    Some(NextPageSignal::Probe)
                                }
                                Probe::Empty => None,
                                Probe::Failed(failure) => {
                                    tracing::debug!("Probe of page {} failed: {}", page + 1, failure);
                                    None
                                }
                            }
                        }
                    };

                    match signal {
                        Some(signal) => tracing::debug!("Page {} follows ({:?})", page + 1, signal),
                        None => return state.finish(StopReason::LastPage { page }),
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return self.cancelled(state, page + 1),
                _ = tokio::time::sleep(self.settings.page_delay()) => {}
            }

            page += 1;
        }
    }

    /// Fetches `page` with the short timeout to see whether it has rows
    ///
    /// Any failure means "no next page".
    async fn probe(&self, page: u32) -> Probe {
        match self.fetcher.fetch(page, self.settings.probe_timeout()).await {
            Ok(fetched) => {
                if has_player_rows(&fetched.document()) {
                    Probe::Rows(fetched)
                } else {
                    Probe::Empty
                }
            }
            Err(failure) => Probe::Failed(failure),
        }
    }

    fn cancelled(&self, state: RunState, page: u32) -> CrawlReport {
        tracing::warn!("Crawl interrupted at page {}", page);
        state.finish(StopReason::Cancelled { page })
    }
}

/// Extracts rows and, when pagination drives the crawl, the next-page link
///
/// The document is dropped before returning so no parse tree is held across
/// an await point.
fn read_page(
    fetched: &FetchedPage,
    policy: CellPolicy,
    termination: Termination,
) -> (TableScan, Option<NextPageSignal>) {
    let document = fetched.document();
    let scan = extract_players(&document, policy);

    let signal = match termination {
        Termination::Pagination if scan.outcome().can_continue() => {
            let page_url = Url::parse(&fetched.url).ok();
            page_url.and_then(|url| find_next_link(&document, &url, fetched.page))
        }
        _ => None,
    };

    (scan, signal)
}

/// Runs a crawl with the given configuration
///
/// Uses the bounded crawl when `config.crawler.max_pages` is set.
///
/// # Example
///
/// ```no_run
/// use pesdb_scrape::config::Config;
/// use pesdb_scrape::crawler::crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&Config::default(), &CancellationToken::new()).await?;
/// println!("{} players", report.players.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, cancel: &CancellationToken) -> Result<CrawlReport, ScrapeError> {
    let crawler = Crawler::new(config)?;
    let report = match config.crawler.max_pages {
        Some(max_pages) => crawler.run_bounded(max_pages, cancel).await,
        None => crawler.run(cancel).await,
    };
    Ok(report)
}

/// Runs a crawl to completion and returns only the player records
pub async fn crawl_players(config: &Config) -> Result<Vec<PlayerRecord>, ScrapeError> {
    let report = crawl(config, &CancellationToken::new()).await?;
    Ok(report.into_players())
}
