//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the browser identity string
//! - Building the listing URL for a page index
//! - Single-attempt GET requests with a per-request timeout
//! - Error classification into a [`FetchFailure`]

use crate::config::{Config, UserAgentConfig};
use crate::{ConfigError, ScrapeError};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Query parameter carrying the page index
pub const PAGE_PARAM: &str = "page";

/// A successfully fetched listing page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 1-based page index
    pub page: u32,
    /// Final URL after redirects
    pub url: String,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Parses the body into a document tree
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// A page that could not be fetched
///
/// The fetcher never lets an error escape in any other form; the caller
/// decides whether a failure ends the crawl.
#[derive(Debug, Clone, Error)]
#[error("page {page} ({url}): {cause}")]
pub struct FetchFailure {
    pub page: u32,
    pub url: String,
    pub cause: FetchCause,
}

/// Underlying reason for a [`FetchFailure`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Request(String),
}

impl FetchCause {
    fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Builds an HTTP client with the configured user agent
///
/// Timeouts are set per request so the primary fetch and the lookahead probe
/// can use different limits with the same client.
///
/// # Example
///
/// ```no_run
/// use pesdb_scrape::config::UserAgentConfig;
/// use pesdb_scrape::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.as_str())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the URL of a listing page
///
/// Page 1 is the base URL itself; later pages append `page=<index>` to the
/// query string, keeping any parameters the base URL already carries.
///
/// # Example
///
/// ```
/// use pesdb_scrape::crawler::page_url;
/// use url::Url;
///
/// let base = Url::parse("https://pesdb.net/efootball/").unwrap();
/// assert_eq!(page_url(&base, 1).as_str(), "https://pesdb.net/efootball/");
/// assert_eq!(page_url(&base, 3).as_str(), "https://pesdb.net/efootball/?page=3");
/// ```
pub fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    if page > 1 {
        url.query_pairs_mut()
            .append_pair(PAGE_PARAM, &page.to_string());
    }
    url
}

/// Fetches listing pages from one base URL
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
}

impl PageFetcher {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Builds a fetcher from the source and user agent sections of the config
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.source.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid base_url '{}': {}",
                config.source.base_url, e
            ))
        })?;
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn page_url(&self, page: u32) -> Url {
        page_url(&self.base_url, page)
    }

    /// Fetches one listing page
    ///
    /// Makes exactly one attempt. Non-2xx statuses, connection errors,
    /// timeouts and unreadable bodies all come back as a [`FetchFailure`].
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page index
    /// * `timeout` - Limit for the whole request, body included
    pub async fn fetch(&self, page: u32, timeout: Duration) -> Result<FetchedPage, FetchFailure> {
        let url = self.page_url(page);
        let failure = |cause| FetchFailure {
            page,
            url: url.to_string(),
            cause,
        };

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| failure(FetchCause::from_reqwest(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(FetchCause::Status(status.as_u16())));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| failure(FetchCause::from_reqwest(&e)))?;

        Ok(FetchedPage {
            page,
            url: final_url,
            body,
        })
    }
}
