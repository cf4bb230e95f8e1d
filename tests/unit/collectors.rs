//! Collector behavior over in-memory job sources

use async_trait::async_trait;
use job_listing_downloader::downloader::{DetailCollector, ListCollector, Pipeline};
use job_listing_downloader::fetcher::{
    FetchContext, FetchError, FetcherError, JobSource, RawDetailDoc, RawListPage,
};
use job_listing_downloader::query::{QuerySpec, SearchQuery};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Page 1 is slow; every other page answers at once with `per_page` items
struct SlowFirstPage {
    per_page: usize,
    detail_calls: AtomicUsize,
}

fn item(page: u32, n: usize) -> serde_json::Value {
    let id = format!("p{page}n{n}");
    json!({
        "jobType": "1", "jobName": id, "appearDate": "20241018", "applyCnt": 0,
        "applyDesc": "", "custName": "", "jobAddrNoDesc": "", "jobAddress": "",
        "link": { "job": format!("//board.test/job/{id}"), "applyAnalyze": "", "cust": "" },
        "lon": "", "lat": "", "optionEdu": "", "periodDesc": "", "salaryDesc": "",
        "salaryHigh": 0, "salaryLow": 0, "tags": []
    })
}

#[async_trait]
impl JobSource for SlowFirstPage {
    async fn fetch_page(&self, _query: &SearchQuery, page: u32) -> Result<RawListPage, FetchError> {
        if page == 1 {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(RawListPage {
            total_count: 1000,
            list: (0..self.per_page).map(|n| item(page, n)).collect(),
        })
    }

    async fn fetch_detail(&self, job_id: &str) -> Result<RawDetailDoc, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if job_id == "p2n0" {
            return Err(FetchError::new(
                FetchContext::Detail(job_id.to_string()),
                FetcherError::HttpStatus {
                    status: 404,
                    body: String::new(),
                },
            ));
        }
        Ok(RawDetailDoc::default())
    }
}

fn spec(max_results: u32) -> QuerySpec {
    QuerySpec::new("rust", NonZeroU32::new(max_results).unwrap())
}

#[tokio::test]
async fn test_collection_does_not_wait_for_stragglers() {
    let source = Arc::new(SlowFirstPage {
        per_page: 40,
        detail_calls: AtomicUsize::new(0),
    });

    let started = Instant::now();
    let collection = ListCollector::new(source).collect(&spec(40)).await;

    assert_eq!(collection.pages_requested, 2);
    assert_eq!(collection.items.len(), 40);
    assert!(collection.errors.is_empty());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_detail_collector_attempts_every_identifier() {
    let source = Arc::new(SlowFirstPage {
        per_page: 0,
        detail_calls: AtomicUsize::new(0),
    });
    let ids: Vec<String> = (0..12).map(|n| format!("p2n{n}")).collect();

    let collection = DetailCollector::new(source.clone()).collect(&ids).await;

    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 12);
    assert_eq!(collection.records.len(), 11);
    assert_eq!(collection.errors.len(), 1);
    assert_eq!(collection.errors[0].label(), "detail p2n0");
}

#[tokio::test]
async fn test_pipeline_over_shared_source() {
    let source = Arc::new(SlowFirstPage {
        per_page: 30,
        detail_calls: AtomicUsize::new(0),
    });

    let outcome = Pipeline::with_source(source.clone())
        .run(spec(25))
        .await
        .unwrap();

    assert_eq!(outcome.list_records.len(), 25);
    assert!(outcome.list_records.iter().all(|r| r.job_id.starts_with("p2n")));
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 25);
    assert_eq!(outcome.detail_records.len() + outcome.errors.len(), 25);
    assert_eq!(outcome.total_count, 1000);
}
