//! Command line smoke tests

use super::support::{list_page, job_ids, DetailResponder};
use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cmd() -> Command {
    Command::cargo_bin("job-listing-downloader").unwrap()
}

#[test]
fn test_help_lists_search() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_search_help_lists_flags() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--keyword"))
        .stdout(predicate::str::contains("--max-results"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_invalid_sort_mode_is_rejected() {
    cmd()
        .args(["search", "--keyword", "rust", "--sort", "popularity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sort mode"));
}

#[test]
fn test_zero_max_results_is_rejected() {
    cmd()
        .args(["search", "--keyword", "rust", "--max-results", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_prints_json_document() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_page(2, &job_ids(0, 2))))
        .mount(&server)
        .await;
    Mock::given(path_regex(r"^/job/ajax/content/[^/]+$"))
        .respond_with(DetailResponder)
        .mount(&server)
        .await;

    let origin = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        cmd()
            .args([
                "search",
                "--keyword",
                "rust",
                "--max-results",
                "2",
                "--json",
                "--no-progress",
                "--origin",
                origin.as_str(),
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["list"].as_array().unwrap().len(), 2);
    assert_eq!(document["details"].as_array().unwrap().len(), 2);
    assert_eq!(document["errors"], serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_prints_summary_by_default() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_page(3, &job_ids(0, 3))))
        .mount(&server)
        .await;
    Mock::given(path_regex(r"^/job/ajax/content/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let origin = server.uri();
    let assert = tokio::task::spawn_blocking(move || {
        cmd()
            .args(["search", "--keyword", "rust", "--max-results", "3", "--origin"])
            .arg(origin)
            .arg("--no-progress")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Listings: 3"))
        .stdout(predicate::str::contains("Failed requests: 3"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_keyword_searches_by_filters() {
    let server = MockServer::start().await;
    Mock::given(path("/jobs/search/list"))
        .and(query_param("keyword", ""))
        .and(query_param("area", "6001001000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_page(1, &job_ids(0, 1))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path_regex(r"^/job/ajax/content/[^/]+$"))
        .respond_with(DetailResponder)
        .mount(&server)
        .await;

    let origin = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        cmd()
            .args([
                "search",
                "--keyword",
                "",
                "--filter",
                "area=6001001000",
                "--max-results",
                "1",
                "--json",
                "--no-progress",
                "--origin",
                origin.as_str(),
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["list"].as_array().unwrap().len(), 1);
    assert_eq!(document["errors"], serde_json::json!([]));
}

#[test]
fn test_reserved_filter_key_is_rejected() {
    cmd()
        .args(["search", "--keyword", "rust", "--filter", "order=16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sort"));
}
