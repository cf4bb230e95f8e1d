//! Page and detail requests against a mock board

use super::support::{config_for, list_page, job_ids, DetailResponder};
use job_listing_downloader::downloader::{PipelineConfig, ThrottleConfig};
use job_listing_downloader::fetcher::{BoardConfig, FetchContext, FetcherError, JobBoardClient, JobSource};
use job_listing_downloader::query::QuerySpec;
use serde_json::json;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> JobBoardClient {
    JobBoardClient::new(&config_for(server)).unwrap()
}

fn spec() -> QuerySpec {
    QuerySpec::new("rust", NonZeroU32::new(20).unwrap())
}

#[tokio::test]
async fn test_page_request_carries_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/search/list"))
        .and(query_param("keyword", "rust"))
        .and(query_param("kwop", "7"))
        .and(query_param("order", "14"))
        .and(query_param("asc", "0"))
        .and(query_param("page", "3"))
        .and(header("referer", format!("{}/jobs/search/", server.uri()).as_str()))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_page(42, &job_ids(0, 2))))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .fetch_page(&spec().search_query(), 3)
        .await
        .unwrap();

    assert_eq!(page.total_count, 42);
    assert_eq!(page.list.len(), 2);
}

#[tokio::test]
async fn test_non_success_status_is_a_page_error() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch_page(&spec().search_query(), 2)
        .await
        .unwrap_err();

    assert_eq!(error.context, FetchContext::ListPage(2));
    assert_eq!(
        error.error,
        FetcherError::HttpStatus {
            status: 503,
            body: "busy".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_data_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 200 })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .fetch_page(&spec().search_query(), 1)
        .await
        .unwrap();

    assert_eq!(page.total_count, 0);
    assert!(page.list.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch_page(&spec().search_query(), 1)
        .await
        .unwrap_err();

    assert!(matches!(error.error, FetcherError::ParseError(_)));
}

#[tokio::test]
async fn test_detail_request_uses_listing_referer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/ajax/content/8f2kq"))
        .and(header("referer", format!("{}/job/8f2kq", server.uri()).as_str()))
        .respond_with(DetailResponder)
        .expect(1)
        .mount(&server)
        .await;

    let doc = client_for(&server).fetch_detail("8f2kq").await.unwrap();

    assert_eq!(doc.as_value()["custNo"], "acme");
}

#[tokio::test]
async fn test_detail_failure_names_the_listing() {
    let server = MockServer::start().await;
    Mock::given(path("/job/ajax/content/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_detail("gone").await.unwrap_err();

    assert_eq!(error.context, FetchContext::Detail("gone".to_string()));
    assert_eq!(error.label(), "detail gone");
    assert!(error.message().contains("404"));
}

#[tokio::test]
async fn test_unreachable_board_is_a_network_error() {
    let config = PipelineConfig::for_origin("http://127.0.0.1:1")
        .with_throttle(ThrottleConfig::default().without_jitter());

    let client = JobBoardClient::new(&config).unwrap();
    let error = client.fetch_detail("a1").await.unwrap_err();

    assert!(matches!(error.error, FetcherError::NetworkError(_)));
}

const JITTER: Duration = Duration::from_millis(800);

/// Client whose post-page pause is pinned to `JITTER`
fn paced_client_for(server: &MockServer) -> JobBoardClient {
    let config = PipelineConfig::for_origin(&server.uri())
        .with_throttle(ThrottleConfig::new(10, JITTER, JITTER));
    JobBoardClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_successful_page_pays_the_pause() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_page(1, &job_ids(0, 1))))
        .mount(&server)
        .await;

    let started = Instant::now();
    let page = paced_client_for(&server)
        .fetch_page(&spec().search_query(), 1)
        .await
        .unwrap();

    assert_eq!(page.list.len(), 1);
    assert!(started.elapsed() >= JITTER);
}

#[tokio::test]
async fn test_failed_page_returns_without_pause() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let started = Instant::now();
    let error = paced_client_for(&server)
        .fetch_page(&spec().search_query(), 1)
        .await
        .unwrap_err();

    assert!(matches!(error.error, FetcherError::HttpStatus { status: 500, .. }));
    assert!(started.elapsed() < JITTER / 2);
}

#[tokio::test]
async fn test_page_with_unexpected_data_returns_without_pause() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "oops" })))
        .mount(&server)
        .await;

    let started = Instant::now();
    let error = paced_client_for(&server)
        .fetch_page(&spec().search_query(), 1)
        .await
        .unwrap_err();

    assert_eq!(error.context, FetchContext::ListPage(1));
    assert!(matches!(error.error, FetcherError::ParseError(_)));
    assert!(started.elapsed() < JITTER / 2);
}

#[tokio::test]
async fn test_detail_never_pauses() {
    let server = MockServer::start().await;
    Mock::given(path("/job/ajax/content/a1"))
        .respond_with(DetailResponder)
        .mount(&server)
        .await;

    let started = Instant::now();
    paced_client_for(&server).fetch_detail("a1").await.unwrap();

    assert!(started.elapsed() < JITTER / 2);
}

#[tokio::test]
async fn test_slow_board_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(path("/job/ajax/content/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": {} }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = PipelineConfig {
        board: BoardConfig::for_origin(&server.uri())
            .with_request_timeout(Duration::from_millis(200)),
        throttle: ThrottleConfig::default().without_jitter(),
    };
    let error = JobBoardClient::new(&config)
        .unwrap()
        .fetch_detail("slow")
        .await
        .unwrap_err();

    assert!(matches!(error.error, FetcherError::NetworkError(_)));
}
