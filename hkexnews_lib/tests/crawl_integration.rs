use std::time::Duration;

use chrono::{TimeZone, Utc};
use hkexnews_lib::hkexnews_api::{Error as ApiError, LATEST_PATH, SEARCH_PATH};
use hkexnews_lib::{
    extract_session_state, fetch_latest, parse_results_page, Client, CrawlConfig, HkexNewsError,
    PortalLayout, SearchCrawler, SearchQuery, StopReason,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_FORM: &str = include_str!("fixtures/search_form.html");
const RESULTS_PAGE1: &str = include_str!("fixtures/results_page1.html");
const RESULTS_PAGE2: &str = include_str!("fixtures/results_page2.html");
const RESULTS_NO_NEXT: &str = include_str!("fixtures/results_no_next.html");
const LATEST: &str = include_str!("fixtures/latest.html");

fn no_delay() -> CrawlConfig {
    CrawlConfig {
        page_delay: Duration::ZERO,
        max_pages: None,
    }
}

fn query() -> SearchQuery {
    SearchQuery::parse("00763", "2018-07-04", "2018-07-20").unwrap()
}

async fn mount_search_form(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_FORM))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_search_submit(server: &MockServer, body: &'static str, expected: u64) {
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_string_contains("__VIEWSTATE=vs-form"))
        .and(body_string_contains("__VIEWSTATEGENERATOR=gen-form"))
        .and(body_string_contains("ctl00%24txt_today=20180720"))
        .and(body_string_contains("ctl00%24rdo_SelectSortBy=rbDateTime"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_next_page(server: &MockServer, body: &'static str, expected: u64) {
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_string_contains("__VIEWSTATE=vs-page1"))
        .and(body_string_contains("ctl00%24btnNext2.x=22"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Fixture parsing
// ============================================================================

#[test]
fn search_form_fixture_carries_tokens() {
    let layout = PortalLayout::embedded().unwrap();
    let session = extract_session_state(SEARCH_FORM, &layout).unwrap();
    assert_eq!(session.get("__VIEWSTATE"), Some("vs-form"));
    assert_eq!(session.get("__VIEWSTATEGENERATOR"), Some("gen-form"));
    assert_eq!(session.get("ctl00$hfStatus"), Some("ACM"));
    assert_eq!(session.len(), 4);
}

#[test]
fn results_fixture_parses() {
    let layout = PortalLayout::embedded().unwrap();
    let origin = url::Url::parse("http://www.hkexnews.hk").unwrap();
    let page = parse_results_page(RESULTS_PAGE1, &layout, &origin).unwrap();

    assert_eq!(page.records.len(), 3);
    assert!(page.has_next_page);
    assert_eq!(
        page.watermark,
        Some(Utc.with_ymd_and_hms(2018, 7, 10, 8, 15, 0).unwrap())
    );
    assert_eq!(page.session.get("__VIEWSTATE"), Some("vs-page1"));

    let first = &page.records[0];
    assert_eq!(first.stock_code, "00763.HK");
    assert_eq!(
        first.title,
        "Announcements and Notices - [Overseas Regulatory Announcement - Other]"
    );
    assert_eq!(first.title_extension, "OVERSEAS REGULATORY ANNOUNCEMENT");
    assert_eq!(
        first.document_url.as_deref(),
        Some("http://www.hkexnews.hk/listedco/listconews/SEHK/2018/0720/LTN201807201071.pdf")
    );
    assert_eq!(first.published_at_text, "20/07/2018-18:02");
}

// ============================================================================
// Search crawl
// ============================================================================

#[tokio::test]
async fn crawl_stops_when_watermark_leaves_range() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_PAGE1, 1).await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_string_contains("__VIEWSTATE=vs-page1"))
        .and(body_string_contains("__VIEWSTATEGENERATOR=gen-page1"))
        .and(body_string_contains("ctl00%24btnNext2.x=22"))
        .and(body_string_contains("ctl00%24btnNext2.y=8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE2))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(&client, &layout, no_delay());

    let outcome = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 5);
    assert_eq!(
        outcome.stop,
        StopReason::WatermarkBeforeRange {
            watermark: Utc.with_ymd_and_hms(2018, 7, 3, 12, 0, 0).unwrap()
        }
    );
    // Records beyond the range on the last page are kept as returned.
    assert_eq!(outcome.records[4].published_at_text, "03/07/2018-12:00");
}

#[tokio::test]
async fn crawl_without_next_control_fetches_one_page() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_NO_NEXT, 1).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(&client, &layout, no_delay());

    let outcome = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.stop, StopReason::NoNextPage);
}

#[tokio::test]
async fn crawl_respects_page_limit() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_PAGE1, 1).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(
        &client,
        &layout,
        CrawlConfig {
            page_delay: Duration::ZERO,
            max_pages: Some(1),
        },
    );

    let outcome = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.stop, StopReason::PageLimit { pages: 1 });
}

#[tokio::test]
async fn crawl_waits_page_delay_before_next_page() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_PAGE1, 1).await;
    mount_next_page(&server, RESULTS_PAGE2, 1).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let delay = Duration::from_millis(300);
    let crawler = SearchCrawler::with_config(
        &client,
        &layout,
        CrawlConfig {
            page_delay: delay,
            max_pages: None,
        },
    );

    let started = std::time::Instant::now();
    let outcome = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.pages_fetched, 2);
    assert!(
        elapsed >= delay,
        "two pages took {elapsed:?}, expected at least {delay:?}"
    );
}

#[tokio::test]
async fn cancel_during_page_delay_keeps_first_page() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_PAGE1, 1).await;
    mount_next_page(&server, RESULTS_PAGE2, 0).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(
        &client,
        &layout,
        CrawlConfig {
            page_delay: Duration::from_secs(60),
            max_pages: None,
        },
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let failure = tokio::time::timeout(Duration::from_secs(10), crawler.crawl(&query(), &cancel))
        .await
        .expect("cancellation should interrupt the page delay")
        .unwrap_err();

    assert_eq!(failure.pages_fetched, 1);
    assert_eq!(failure.records.len(), 3);
    assert_eq!(failure.records[0].published_at_text, "20/07/2018-18:02");
    assert!(matches!(failure.error, HkexNewsError::Cancelled));
}

#[tokio::test]
async fn server_error_on_second_page_keeps_first_page() {
    let server = MockServer::start().await;
    mount_search_form(&server, 1).await;
    mount_search_submit(&server, RESULTS_PAGE1, 1).await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_string_contains("ctl00%24btnNext2.x=22"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Runtime Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(&client, &layout, no_delay());

    let failure = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(failure.pages_fetched, 1);
    assert_eq!(failure.records.len(), 3);
    match failure.error {
        HkexNewsError::Api(ApiError::HttpStatus { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_crawl_issues_no_requests() {
    let server = MockServer::start().await;
    mount_search_form(&server, 0).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(&client, &layout, no_delay());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let failure = crawler.crawl(&query(), &cancel).await.unwrap_err();

    assert_eq!(failure.pages_fetched, 0);
    assert!(failure.records.is_empty());
    assert!(matches!(failure.error, HkexNewsError::Cancelled));
}

#[tokio::test]
async fn form_without_view_state_fails_before_submitting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>System maintenance</p></body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE1))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let crawler = SearchCrawler::with_config(&client, &layout, no_delay());

    let failure = crawler
        .crawl(&query(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        failure.error,
        HkexNewsError::MissingSessionState(_)
    ));
}

// ============================================================================
// Latest listing
// ============================================================================

#[tokio::test]
async fn fetch_latest_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(LATEST))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let records = fetch_latest(&client, &layout).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].stock_code, "01398.HK");
    assert_eq!(records[0].stock_name, "ICBC");
    assert_eq!(
        records[0].title,
        "Announcements and Notices - [Overseas Regulatory Announcement - Board/Supervisory Board Resolutions]"
    );
    assert_eq!(records[0].title_extension, "OVERSEAS REGULATORY ANNOUNCEMENT");
    assert_eq!(
        records[0].document_url,
        Some(format!(
            "{}/listedco/listconews/SEHK/2018/0720/LTN201807201201.pdf",
            server.uri()
        ))
    );
    assert_eq!(records[1].stock_code, "00763.HK");
    assert_eq!(records[2].stock_name, "PING AN");
}

#[tokio::test]
async fn fetch_latest_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let layout = PortalLayout::embedded().unwrap();
    let err = fetch_latest(&client, &layout).await.unwrap_err();
    assert!(matches!(
        err,
        HkexNewsError::Api(ApiError::HttpStatus { status: 502, .. })
    ));
}
