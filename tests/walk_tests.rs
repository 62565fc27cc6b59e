//! Integration tests for the catalog walker
//!
//! These tests use wiremock to stand in for the auction site and drive
//! the full walk end-to-end: pagination, retry, and every termination
//! signal.

use lot_harvest::config::{CatalogConfig, Config, FetchConfig, OutputConfig};
use lot_harvest::walker::{CatalogWalker, Termination};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config pointing at the mock server's catalog path
fn test_config(base_url: &str, page_limit: Option<u32>) -> Config {
    Config {
        catalog: CatalogConfig {
            base_url: format!("{}/catalog/1", base_url),
            page_param: "apage".to_string(),
            page_limit,
        },
        fetch: FetchConfig {
            max_retries: 1,
            retry_delay_ms: 10, // Very short for testing
            request_timeout_secs: 5,
            page_delay_ms: 0,
            user_agent: "lot-harvest-test".to_string(),
        },
        output: OutputConfig::default(),
    }
}

/// One well-formed lot tile
fn tile(lot: &str, title: &str) -> String {
    format!(
        r#"<app-lot-tile>
            <span class="lot-number">{lot}</span>
            <h2 class="lot-title">{title}</h2>
            <a class="lot-link" href="/lot/{lot}"><img class="lot-thumbnail" src="/img/{lot}.jpg"></a>
            <span class="d-sm-inline">${lot}.00</span>
        </app-lot-tile>"#
    )
}

/// The catalog's "more lots pending" placeholder tile
fn sentinel_tile() -> String {
    r#"<app-lot-tile><h2 class="lot-title">More Lots Will Be Posted Soon!</h2></app-lot-tile>"#
        .to_string()
}

fn page_body(tiles: &[String]) -> String {
    format!("<html><body>{}</body></html>", tiles.concat())
}

/// Mounts a 200 response for one catalog page
async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/catalog/1"))
        .and(query_param("apage", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_order_preserved_across_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        page_body(&[tile("1", "Alpha"), tile("2", "Beta"), tile("3", "Gamma")]),
    )
    .await;
    mount_page(&server, 2, page_body(&[tile("4", "Delta"), tile("5", "Epsilon")])).await;
    mount_page(&server, 3, page_body(&[])).await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma", "Delta", "Epsilon"]);
    assert!(matches!(outcome.termination, Termination::EmptyPage));
    assert_eq!(outcome.pages_fetched, 3);
}

#[tokio::test]
async fn test_sentinel_stops_page_and_walk() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        page_body(&[
            tile("1", "First"),
            tile("2", "Second"),
            sentinel_tile(),
            tile("3", "After Sentinel"),
        ]),
    )
    .await;

    // Page 2 must never be requested once the sentinel is seen
    Mock::given(method("GET"))
        .and(path("/catalog/1"))
        .and(query_param("apage", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[tile("9", "Nope")])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert!(matches!(outcome.termination, Termination::SentinelSeen));
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn test_retry_masks_single_transient_failure() {
    let server = MockServer::start().await;

    // First attempt at page 1 fails; the retry succeeds
    Mock::given(method("GET"))
        .and(path("/catalog/1"))
        .and(query_param("apage", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, page_body(&[tile("1", "Survivor")])).await;
    mount_page(&server, 2, page_body(&[])).await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "Survivor");
    assert!(matches!(outcome.termination, Termination::EmptyPage));
}

#[tokio::test]
async fn test_exhausted_retries_keep_earlier_pages() {
    let server = MockServer::start().await;

    mount_page(&server, 1, page_body(&[tile("1", "Kept"), tile("2", "Also Kept")])).await;

    // Page 2 fails on every attempt
    Mock::given(method("GET"))
        .and(path("/catalog/1"))
        .and(query_param("apage", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2) // initial attempt + one retry
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Kept", "Also Kept"]);
    assert!(outcome.termination.is_fatal());

    match outcome.termination {
        Termination::FetchFailed(e) => {
            assert_eq!(e.page_index, 2);
            assert_eq!(e.attempts, 2);
        }
        other => panic!("expected FetchFailed, got {}", other),
    }
}

#[tokio::test]
async fn test_page_limit_caps_walk() {
    let server = MockServer::start().await;

    // Every page has lots; only the limit can stop this walk
    for page in 1..=5u32 {
        mount_page(&server, page, page_body(&[tile(&page.to_string(), "Lot")])).await;
    }

    let config = test_config(&server.uri(), Some(2));
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 2);
    assert!(matches!(outcome.termination, Termination::PageLimitReached));
}

#[tokio::test]
async fn test_three_lots_then_empty_page_under_limit() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        page_body(&[tile("1", "A"), tile("2", "B"), tile("3", "C")]),
    )
    .await;
    mount_page(&server, 2, page_body(&[])).await;

    let config = test_config(&server.uri(), Some(2));
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    assert_eq!(outcome.records.len(), 3);
    assert!(matches!(outcome.termination, Termination::EmptyPage));
}

#[tokio::test]
async fn test_whitespace_body_is_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/1"))
        .and(query_param("apage", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n\t  "))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    assert!(outcome.records.is_empty());
    assert!(matches!(outcome.termination, Termination::EmptyPage));
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn test_malformed_tile_dropped_siblings_kept() {
    let server = MockServer::start().await;

    let linkless = r#"<app-lot-tile>
        <h2 class="lot-title">No Link Here</h2>
        <span class="d-sm-inline">$5.00</span>
    </app-lot-tile>"#
        .to_string();

    mount_page(
        &server,
        1,
        page_body(&[tile("1", "Before"), linkless, tile("2", "After")]),
    )
    .await;
    mount_page(&server, 2, page_body(&[])).await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Before", "After"]);
}

#[tokio::test]
async fn test_detail_urls_resolved_against_catalog_host() {
    let server = MockServer::start().await;

    mount_page(&server, 1, page_body(&[tile("7", "Resolved")])).await;
    mount_page(&server, 2, page_body(&[])).await;

    let config = test_config(&server.uri(), None);
    let outcome = CatalogWalker::new(&config).unwrap().walk().await;

    assert_eq!(outcome.records[0].detail_url, format!("{}/lot/7", server.uri()));
}
