//! Record transformer through the public API

use job_listing_downloader::fetcher::RawDetailDoc;
use job_listing_downloader::transform::{RecordTransformer, TransformError};
use serde_json::json;

#[test]
fn test_job_id_ignores_query_and_fragment() {
    assert_eq!(
        RecordTransformer::extract_job_id("//www.104.com.tw/job/7x9k2?jobsource=hotjob_chr").unwrap(),
        "7x9k2"
    );
    assert_eq!(
        RecordTransformer::extract_job_id("https://www.104.com.tw/job/7x9k2#apply").unwrap(),
        "7x9k2"
    );
}

#[test]
fn test_job_id_requires_marker_and_identifier() {
    assert!(matches!(
        RecordTransformer::extract_job_id("//www.104.com.tw/company/abc"),
        Err(TransformError::InvalidField { field: "link.job", .. })
    ));
    assert!(matches!(
        RecordTransformer::extract_job_id("//www.104.com.tw/job/?x=1"),
        Err(TransformError::EmptyIdentifier(_))
    ));
}

#[test]
fn test_detail_employment_type_variants() {
    let doc = |job_type: serde_json::Value| {
        RawDetailDoc(json!({ "jobDetail": { "jobType": job_type } }))
    };

    assert_eq!(RecordTransformer::to_detail_record(&doc(json!(1))).job_type, "full-time");
    assert_eq!(RecordTransformer::to_detail_record(&doc(json!("1"))).job_type, "full-time");
    assert_eq!(RecordTransformer::to_detail_record(&doc(json!(2))).job_type, "part-time");
    assert_eq!(RecordTransformer::to_detail_record(&doc(json!(null))).job_type, "");
}

#[test]
fn test_detail_without_analysis_url_has_empty_id() {
    let record = RecordTransformer::to_detail_record(&RawDetailDoc(json!({
        "header": { "jobName": "Engineer" }
    })));

    assert_eq!(record.job_id, "");
    assert_eq!(record.job_name, "Engineer");
    assert!(!record.china_corp);
}
