use serde::Deserialize;
use std::time::Duration;

/// Listing URL used when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "https://pesdb.net/efootball/";

/// Browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration structure for pesdb-scrape
///
/// Every section is optional in the TOML file; missing sections and fields
/// fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Where the player listing lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of the first listing page; later pages add a `page=<n>` parameter
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay between one page and the next fetch (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Timeout for fetching a listing page (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Timeout for the lookahead probe of the next page (milliseconds)
    #[serde(rename = "probe-timeout-ms")]
    pub probe_timeout_ms: u64,

    /// When set, run the bounded crawl over at most this many pages
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl CrawlerConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 2_000,
            fetch_timeout_ms: 10_000,
            probe_timeout_ms: 5_000,
            max_pages: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}
