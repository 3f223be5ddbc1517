//! pesdb-scrape main entry point
//!
//! This is the command-line interface for the player listing scraper.

use anyhow::Context;
use clap::Parser;
use pesdb_scrape::config::{load_config_with_hash, validate, Config};
use pesdb_scrape::crawler::crawl;
use pesdb_scrape::output::{
    print_statistics, write_players_json, write_players_to_path, CrawlStatistics,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit status used when the crawl was interrupted with Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

/// pesdb-scrape: a polite player listing scraper
///
/// Walks the paginated player listing one page at a time, with a fixed
/// delay between pages, and prints every player row as JSON.
#[derive(Parser, Debug)]
#[command(name = "pesdb-scrape")]
#[command(version)]
#[command(about = "A polite player listing scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Crawl at most this many pages
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Listing URL to start from
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Show the effective configuration without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current step");
                cancel.cancel();
            }
        }
    });

    let report = crawl(&config, &cancel)
        .await
        .context("failed to start crawl")?;

    if cli.stats {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    let pretty = config.output.pretty && !cli.compact;
    match &cli.output {
        Some(path) => write_players_to_path(path, &report.players, pretty)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => write_players_json(std::io::stdout().lock(), &report.players, pretty)
            .context("failed to write players to stdout")?,
    }

    if report.was_cancelled() {
        std::process::exit(EXIT_INTERRUPTED);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pesdb_scrape=info,warn"),
            1 => EnvFilter::new("pesdb_scrape=debug,info"),
            2 => EnvFilter::new("pesdb_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.source.base_url = base_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== pesdb-scrape Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  User agent: {}", config.user_agent.value);

    println!("\nCrawler:");
    println!("  Delay between pages: {}ms", config.crawler.page_delay_ms);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Probe timeout: {}ms", config.crawler.probe_timeout_ms);
    match config.crawler.max_pages {
        Some(max_pages) => println!("  Mode: bounded ({} pages)", max_pages),
        None => println!("  Mode: follow pagination"),
    }

    println!("\nOutput:");
    println!("  Pretty JSON: {}", config.output.pretty);

    println!("\n✓ Configuration is valid");
}
