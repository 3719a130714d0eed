//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature copy of the dictionary site
//! and run the full cycle: crawl, flush, read the files back.

use std::collections::BTreeMap;
use std::path::Path;
use tatdict::config::{Config, CrawlStrategy};
use tatdict::crawler::{crawl, Coordinator};
use tatdict::output::PersistenceSink;
use tatdict::storage::ResultStore;
use tatdict::ScrapeError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &Path, strategy: CrawlStrategy) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.strategy = strategy;
    config.crawler.max_concurrent_fetches = 4;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.json_path = dir.join("words.json").display().to_string();
    config.output.csv_path = dir.join("words.csv").display().to_string();
    config
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn word_page(word: &str, blocks: &[&str]) -> String {
    let divs: String = blocks.iter().map(|b| format!("<div>{}</div>", b)).collect();
    format!(
        r#"<html><body>
        <div id="TerminTitle"><h1>{}</h1></div>
        <dl><dt>Перевод</dt><dd class="descript">{}</dd></dl>
        </body></html>"#,
        word, divs
    )
}

/// Mounts two sections, each with two pagination pages and three words.
/// One word has only a grammar note, so five words end up in the output.
async fn mount_dictionary(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><body><div class="contents-wrap">
            <a href="/s/a">А</a> <a href="/s/b">Б</a>
        </div></body></html>"#
            .to_string(),
    )
    .await;

    for section in ["a", "b"] {
        mount_page(
            server,
            &format!("/s/{}", section),
            format!(
                r#"<html><body><div class="page-nav">
                    <ul><li>1</li></ul>
                    <ul><li><a href="/l/{s}?f={s}&p=2">2</a></li></ul>
                </div></body></html>"#,
                s = section
            ),
        )
        .await;

        // Page two is mounted first so it wins over the bare path below
        Mock::given(method("GET"))
            .and(path(format!("/l/{}", section)))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<div class="terms-wrap"><a href="/w/{}3">3</a></div>"#,
                section
            )))
            .mount(server)
            .await;
        mount_page(
            server,
            &format!("/l/{}", section),
            format!(
                r#"<div class="terms-wrap"><a href="/w/{s}1">1</a><a href="/w/{s}2">2</a></div>"#,
                s = section
            ),
        )
        .await;
    }

    mount_page(server, "/w/a1", word_page("алма", &["яблоко"])).await;
    mount_page(server, "/w/a2", word_page("бер", &["числ.", "один"])).await;
    mount_page(server, "/w/a3", word_page("һәм", &["союз."])).await;
    mount_page(server, "/w/b1", word_page("ике", &["два", "вдвоём"])).await;
    mount_page(server, "/w/b2", word_page("өч", &["три"])).await;
    mount_page(server, "/w/b3", word_page("су", &["вода"])).await;
}

fn read_json(path: &str) -> BTreeMap<String, String> {
    let content = std::fs::read_to_string(path).expect("JSON file written");
    serde_json::from_str(&content).expect("valid JSON object")
}

fn read_csv(path: &str) -> Vec<(String, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("CSV file written");
    let rows = reader
        .deserialize()
        .map(|row| row.expect("two-column row"))
        .collect();
    rows
}

async fn run_full_crawl(strategy: CrawlStrategy) {
    let server = MockServer::start().await;
    mount_dictionary(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), strategy);

    let coordinator = Coordinator::from_config(&config).unwrap();
    let store = ResultStore::new();
    crawl(&coordinator, &store, std::future::pending())
        .await
        .unwrap();

    let written = PersistenceSink::from_config(&config.output)
        .flush(&store)
        .unwrap();
    assert_eq!(written, 5);

    let json = read_json(&config.output.json_path);
    assert_eq!(json.len(), 5);
    assert_eq!(json["алма"], "яблоко\n");
    assert_eq!(json["бер"], "один\n");
    assert_eq!(json["ике"], "два\nвдвоём\n");
    assert_eq!(json["өч"], "три\n");
    assert_eq!(json["су"], "вода\n");
    assert!(!json.contains_key("һәм"));

    let csv_rows = read_csv(&config.output.csv_path);
    assert_eq!(csv_rows.len(), 5);
    let csv_map: BTreeMap<_, _> = csv_rows.into_iter().collect();
    assert_eq!(csv_map, json);

    let stats = coordinator.statistics();
    assert_eq!(stats.sections, 2);
    assert_eq!(stats.pagination_pages, 4);
    assert_eq!(stats.word_pages, 6);
    assert_eq!(stats.words_empty, 1);
    assert_eq!(stats.pages_skipped, 0);
}

#[tokio::test]
async fn test_full_crawl_streaming() {
    run_full_crawl(CrawlStrategy::Streaming).await;
}

#[tokio::test]
async fn test_full_crawl_staged() {
    run_full_crawl(CrawlStrategy::Staged).await;
}

#[tokio::test]
async fn test_not_found_section_is_skipped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<div class="contents-wrap"><a href="/s/a">А</a><a href="/s/gone">?</a></div>"#
            .to_string(),
    )
    .await;
    mount_dictionary(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), CrawlStrategy::Streaming);

    let coordinator = Coordinator::from_config(&config).unwrap();
    let store = ResultStore::new();
    crawl(&coordinator, &store, std::future::pending())
        .await
        .unwrap();

    // Section "a" only: three words, one without a translation
    assert_eq!(store.len(), 2);
    assert_eq!(coordinator.statistics().pages_skipped, 1);
}

#[tokio::test]
async fn test_overloaded_site_aborts_but_flushes_partial_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/b2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_dictionary(&server).await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path(), CrawlStrategy::Staged);
    // One fetch at a time makes the word order deterministic:
    // a3 a1 a2 b3 b1 b2
    config.crawler.max_concurrent_fetches = 1;

    let coordinator = Coordinator::from_config(&config).unwrap();
    let store = ResultStore::new();
    let result = crawl(&coordinator, &store, std::future::pending()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ScrapeError::Status { status: 503, .. }));
    assert!(err.is_transient());

    let written = PersistenceSink::from_config(&config.output)
        .flush(&store)
        .unwrap();
    assert_eq!(written, 4);

    let json = read_json(&config.output.json_path);
    let keys: Vec<_> = json.keys().cloned().collect();
    assert_eq!(keys, vec!["алма", "бер", "ике", "су"]);
    assert_eq!(read_csv(&config.output.csv_path).len(), 4);
}

#[tokio::test]
async fn test_redirect_loop_on_word_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/a1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/w/a1"))
        .mount(&server)
        .await;
    mount_dictionary(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), CrawlStrategy::Streaming);

    let coordinator = Coordinator::from_config(&config).unwrap();
    let store = ResultStore::new();
    crawl(&coordinator, &store, std::future::pending())
        .await
        .unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.get("алма"), None);
    assert_eq!(coordinator.statistics().pages_skipped, 1);
}
