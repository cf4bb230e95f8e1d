//! Shared fixtures for board-backed tests

#![allow(dead_code)]

use job_listing_downloader::downloader::{PipelineConfig, ThrottleConfig};
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// Pipeline config aimed at a mock server, without the post-page pause
pub fn config_for(server: &MockServer) -> PipelineConfig {
    PipelineConfig::for_origin(&server.uri())
        .with_throttle(ThrottleConfig::default().without_jitter())
}

/// A well-formed search result item
pub fn list_item(job_id: &str) -> Value {
    json!({
        "jobType": "1",
        "jobName": format!("Engineer {job_id}"),
        "appearDate": "20241018",
        "applyCnt": 4,
        "applyDesc": "0~5",
        "custName": "Acme Corp",
        "jobAddrNoDesc": "Taipei City",
        "jobAddress": "No. 1, Main Rd.",
        "link": {
            "job": format!("//www.104.com.tw/job/{job_id}?jobsource=index_s"),
            "applyAnalyze": format!("//www.104.com.tw/jobs/apply/analysis/{job_id}"),
            "cust": "//www.104.com.tw/company/acme"
        },
        "lon": "121.56",
        "lat": "25.03",
        "optionEdu": "Bachelor",
        "periodDesc": "2 years",
        "salaryDesc": "Monthly 50,000",
        "salaryHigh": 0,
        "salaryLow": 50000,
        "tags": ["remote"]
    })
}

/// Search page body with the given identifiers
pub fn list_page(total_count: u64, job_ids: &[String]) -> Value {
    let items: Vec<Value> = job_ids.iter().map(|id| list_item(id)).collect();
    json!({ "data": { "totalCount": total_count, "list": items } })
}

/// Identifiers `job0`..`job{n-1}` starting at `from`
pub fn job_ids(from: usize, count: usize) -> Vec<String> {
    (from..from + count).map(|i| format!("job{i}")).collect()
}

/// Answers `/job/ajax/content/{id}` with a detail document for `{id}`
pub struct DetailResponder;

impl Respond for DetailResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let job_id = request.url.path().rsplit('/').next().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "header": {
                    "jobName": format!("Engineer {job_id}"),
                    "custName": "Acme Corp",
                    "appearDate": "2024/10/18",
                    "analysisUrl": format!("//www.104.com.tw/jobs/apply/analysis/{job_id}")
                },
                "jobDetail": {
                    "jobType": 1,
                    "addressRegion": "Taipei City",
                    "addressDetail": "No. 1, Main Rd."
                },
                "condition": { "skill": [{ "description": "Rust" }] },
                "custNo": "acme"
            }
        }))
    }
}
