//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a paginated player listing and run the
//! full crawl loop against it end-to-end.

use pesdb_scrape::config::{Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};
use pesdb_scrape::crawler::{crawl, crawl_players, Crawler};
use pesdb_scrape::{PlayerRecord, StopReason};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const LISTING_PATH: &str = "/efootball/";

/// Matches requests for the first listing page, which carries no `page` parameter
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "page")
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> Config {
    Config {
        source: SourceConfig {
            base_url: format!("{}{}", server.uri(), LISTING_PATH),
        },
        user_agent: UserAgentConfig::default(),
        crawler: CrawlerConfig {
            page_delay_ms: 0,
            fetch_timeout_ms: 2_000,
            probe_timeout_ms: 1_000,
            max_pages: None,
        },
        output: OutputConfig::default(),
    }
}

fn player_row(position: &str, name: &str) -> String {
    format!(
        "<tr><td>{}</td><td> {} </td><td>FC Example</td><td>BRA</td>\
         <td>185</td><td>80</td><td>27</td><td>84</td></tr>",
        position, name
    )
}

/// Builds a listing page with a players table and optional pagination markup
fn listing_page(rows: &[String], pagination: &str) -> String {
    format!(
        r#"<html><head><title>Players</title></head><body>
        <table class="players">
            <thead><tr><th>Pos</th><th>Player</th><th>Team</th><th>Nat</th>
            <th>Height</th><th>Weight</th><th>Age</th><th>Ovr</th></tr></thead>
            <tbody>{}</tbody>
        </table>
        <div class="pages">{}</div>
        </body></html>"#,
        rows.concat(),
        pagination
    )
}

/// Page `page` holding two players named `p<page>-a` and `p<page>-b`
fn numbered_page(page: u32, pagination: &str) -> String {
    listing_page(
        &[
            player_row("GK", &format!("p{}-a", page)),
            player_row("CF", &format!("p{}-b", page)),
        ],
        pagination,
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn page_mock(page: u32, response: ResponseTemplate) -> Mock {
    let mock = Mock::given(method("GET")).and(path(LISTING_PATH));
    if page == 1 {
        mock.and(FirstPage).respond_with(response)
    } else {
        mock.and(query_param("page", page.to_string()))
            .respond_with(response)
    }
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    page_mock(page, response).mount(server).await;
}

fn names(players: &[PlayerRecord]) -> Vec<String> {
    players.iter().map(|p| p.name.clone()).collect()
}

#[tokio::test]
async fn test_crawl_follows_explicit_page_links() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, r#"<a href="?page=2">2</a>"#))).await;
    mount_page(&mock_server, 2, html(numbered_page(2, r#"<a href="?page=1">1</a><a href="?page=3">3</a>"#))).await;
    mount_page(&mock_server, 3, html(numbered_page(3, r#"<a href="?page=2">2</a>"#))).await;
    // Page 4 is not mounted: the probe gets a 404

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(
        names(&report.players),
        vec!["p1-a", "p1-b", "p2-a", "p2-b", "p3-a", "p3-b"]
    );
    assert_eq!(report.pages_scraped, 3);
    assert_eq!(report.requests, 4);
    assert_eq!(report.stop, StopReason::LastPage { page: 3 });
}

#[tokio::test]
async fn test_crawl_follows_next_label() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, r##"<a href="#more">Next ›</a>"##))).await;
    mount_page(&mock_server, 2, html(numbered_page(2, ""))).await;
    mount_page(
        &mock_server,
        3,
        html("<html><body><p>No more players</p></body></html>".to_string()),
    )
    .await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b", "p2-a", "p2-b"]);
    assert_eq!(report.stop, StopReason::LastPage { page: 2 });
}

#[tokio::test]
async fn test_probe_finds_next_page_and_reuses_it() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, ""))).await;
    page_mock(2, html(numbered_page(2, "")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 3, ResponseTemplate::new(404)).await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b", "p2-a", "p2-b"]);
    assert_eq!(report.pages_scraped, 2);
    // Page 1, probe of page 2 (reused), probe of page 3
    assert_eq!(report.requests, 3);
    assert_eq!(report.stop, StopReason::LastPage { page: 2 });
}

#[tokio::test]
async fn test_slow_lookahead_means_last_page() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, ""))).await;
    // Slower than the 1s lookahead timeout but within the 2s fetch timeout
    mount_page(
        &mock_server,
        2,
        html(numbered_page(2, "")).set_delay(Duration::from_millis(1_500)),
    )
    .await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b"]);
    assert_eq!(report.pages_scraped, 1);
    assert_eq!(report.requests, 2);
    assert_eq!(report.stop, StopReason::LastPage { page: 1 });
}

#[tokio::test]
async fn test_bounded_run_fetch_failure_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, ""))).await;
    mount_page(&mock_server, 2, ResponseTemplate::new(503)).await;
    page_mock(3, html(numbered_page(3, "")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run_bounded(3, &CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b"]);
    assert_eq!(report.pages_scraped, 1);
    assert_eq!(report.requests, 2);
    assert!(report.stop.is_truncated());
    assert_eq!(
        report.stop,
        StopReason::FetchFailed {
            page: 2,
            cause: "HTTP 503".to_string()
        }
    );
}

#[tokio::test]
async fn test_partial_failure_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        let link = format!(r#"<a href="?page={}">{}</a>"#, page + 1, page + 1);
        mount_page(&mock_server, page, html(numbered_page(page, &link))).await;
    }
    mount_page(&mock_server, 4, ResponseTemplate::new(500)).await;

    let report = crawl(&create_test_config(&mock_server), &CancellationToken::new())
        .await
        .expect("Crawl should start");

    assert_eq!(
        names(&report.players),
        vec!["p1-a", "p1-b", "p2-a", "p2-b", "p3-a", "p3-b"]
    );
    assert_eq!(
        report.stop,
        StopReason::FetchFailed {
            page: 4,
            cause: "HTTP 500".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_table_is_end_of_data() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        html("<html><body><h1>Maintenance</h1></body></html>".to_string()),
    )
    .await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert!(report.players.is_empty());
    assert_eq!(report.stop, StopReason::NoTable { page: 1 });
    assert!(report.stop.is_complete());
}

#[tokio::test]
async fn test_empty_table_body_ends_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, r#"<a href="?page=2">2</a>"#))).await;
    mount_page(&mock_server, 2, html(listing_page(&[], r#"<a href="?page=3">3</a>"#))).await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b"]);
    assert_eq!(report.stop, StopReason::NoRows { page: 2 });
}

#[tokio::test]
async fn test_short_rows_skipped_in_crawl() {
    let mock_server = MockServer::start().await;

    let rows = vec![
        player_row("GK", "keeper"),
        "<tr><td colspan=\"8\">Sponsored</td></tr>".to_string(),
        player_row("CB", "defender"),
    ];
    mount_page(&mock_server, 1, html(listing_page(&rows, ""))).await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["keeper", "defender"]);
    assert_eq!(report.players[0].team, "FC Example");
    assert_eq!(report.players[1].position, "CB");
}

#[tokio::test]
async fn test_duplicate_rows_are_kept() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        html(listing_page(&[player_row("GK", "same")], r#"<a href="?page=2">2</a>"#)),
    )
    .await;
    mount_page(&mock_server, 2, html(listing_page(&[player_row("GK", "same")], ""))).await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run(&CancellationToken::new()).await;

    assert_eq!(report.players.len(), 2);
    assert_eq!(report.players[0], report.players[1]);
}

#[tokio::test]
async fn test_bounded_run_stops_at_page_limit() {
    let mock_server = MockServer::start().await;

    for page in 1..=5 {
        let link = format!(r#"<a href="?page={}">Next</a>"#, page + 1);
        let mock = page_mock(page, html(numbered_page(page, &link)));
        let mock = if page > 2 { mock.expect(0) } else { mock };
        mock.mount(&mock_server).await;
    }

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run_bounded(2, &CancellationToken::new()).await;

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b", "p2-a", "p2-b"]);
    assert_eq!(report.requests, 2);
    assert_eq!(report.stop, StopReason::PageLimit { max_pages: 2 });
}

#[tokio::test]
async fn test_bounded_run_counts_header_cells() {
    let mock_server = MockServer::start().await;

    let row = "<tr><th>GK</th><td>J. Doe</td><td>FC Example</td><td>BRA</td>\
               <td>185</td><td>80</td><td>27</td><td>84</td></tr>"
        .to_string();
    mount_page(&mock_server, 1, html(listing_page(&[row], ""))).await;

    let crawler = Crawler::new(&create_test_config(&mock_server)).expect("Failed to create crawler");
    let report = crawler.run_bounded(1, &CancellationToken::new()).await;

    assert_eq!(
        report.players,
        vec![PlayerRecord::from_cells(&[
            "GK",
            "J. Doe",
            "FC Example",
            "BRA",
            "185",
            "80",
            "27",
            "84"
        ])
        .unwrap()]
    );
}

#[tokio::test]
async fn test_bounded_run_stops_early_at_end_of_data() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, ""))).await;
    mount_page(&mock_server, 2, html(listing_page(&[], ""))).await;

    let mut config = create_test_config(&mock_server);
    config.crawler.max_pages = Some(10);

    let report = crawl(&config, &CancellationToken::new())
        .await
        .expect("Crawl should start");

    assert_eq!(names(&report.players), vec!["p1-a", "p1-b"]);
    assert_eq!(report.stop, StopReason::NoRows { page: 2 });
}

#[tokio::test]
async fn test_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, ""))).await;

    let config = create_test_config(&mock_server);
    let first = crawl_players(&config).await.expect("Crawl should start");
    let second = crawl_players(&config).await.expect("Crawl should start");

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cancel_during_delay_returns_collected_players() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(numbered_page(1, r#"<a href="?page=2">2</a>"#))).await;
    page_mock(2, html(numbered_page(2, "")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.crawler.page_delay_ms = 30_000;
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            cancel.cancel();
        }
    });

    let started = Instant::now();
    let report = crawler.run(&cancel).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(names(&report.players), vec!["p1-a", "p1-b"]);
    assert_eq!(report.stop, StopReason::Cancelled { page: 2 });
    assert!(report.was_cancelled());
    assert!(cancel.is_cancelled());
}

#[tokio::test]
async fn test_cancel_during_fetch() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        html(numbered_page(1, "")).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut config = create_test_config(&mock_server);
    config.crawler.fetch_timeout_ms = 20_000;
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            cancel.cancel();
        }
    });

    let started = Instant::now();
    let report = crawler.run(&cancel).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(report.players.is_empty());
    assert_eq!(report.stop, StopReason::Cancelled { page: 1 });
}
