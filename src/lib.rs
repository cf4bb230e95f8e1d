//! # Job Listing Downloader Library
//!
//! A concurrent, bounded and failure-tolerant fetch pipeline for job-board
//! search results. It pages through a remote search API, pulls the detail
//! document of every listing it found, and normalizes both into flat records
//! ready for tabular export.
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most ten requests in flight, with a polite
//!   random pause after every successful list page
//! - **Result cap**: only as many pages as the requested result count needs,
//!   and collection stops as soon as the cap is reached
//! - **Partial-failure tolerance**: a failed page or detail call is recorded
//!   and skipped, never fatal
//! - **Typed records**: [`ListRecord`] and [`DetailRecord`] have fixed,
//!   enumerable field sets
//!
//! ## Quick Start
//!
//! ```no_run
//! use job_listing_downloader::downloader::Pipeline;
//! use job_listing_downloader::query::{QuerySpec, SortDirection, SortMode};
//! use std::num::NonZeroU32;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = QuerySpec::new("rust engineer", NonZeroU32::new(40).unwrap())
//!     .with_filter("ro", "0")
//!     .with_sort(SortMode::Date, SortDirection::Descending);
//!
//! let outcome = Pipeline::new().run(spec).await?;
//! println!(
//!     "{} listings, {} details, {} failed requests",
//!     outcome.list_records.len(),
//!     outcome.detail_records.len(),
//!     outcome.errors.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`query`] - Query specification and search query construction
//! - [`fetcher`] - HTTP boundary: page and detail fetchers behind [`fetcher::JobSource`]
//! - [`downloader`] - Throttle, list/detail collectors and the pipeline orchestrator
//! - [`transform`] - Pure mapping from raw JSON to normalized records
//! - [`summary`] - Listing statistics for the command line report

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Fetch orchestration
pub mod downloader;

/// HTTP fetchers for the job board
pub mod fetcher;

/// Request metrics
pub mod metrics;

/// Query specification and construction
pub mod query;

/// Listing statistics
pub mod summary;

/// Raw JSON to record normalization
pub mod transform;

pub use downloader::{DownloadError, Pipeline, PipelineOutcome};
pub use fetcher::{FetchContext, FetchError, FetcherError};
pub use query::{QuerySpec, SortDirection, SortMode};

/// Normalized listing from one search result page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRecord {
    /// Listing identifier taken from the job link
    pub job_id: String,
    /// Job type code as reported by the board
    pub job_type: String,
    /// Job title
    pub job_name: String,
    /// Posting date (board format, e.g. "20241018")
    pub posting_date: String,
    /// Number of applicants
    pub application_count: i64,
    /// Applicant count description
    pub application_description: String,
    /// Company name
    pub company_name: String,
    /// Area description followed by street address
    pub company_address: String,
    /// Absolute listing URL
    pub job_url: String,
    /// Absolute applicant-analysis URL
    pub job_analysis_url: String,
    /// Absolute company page URL
    pub company_url: String,
    /// Longitude as text
    pub longitude: String,
    /// Latitude as text
    pub latitude: String,
    /// Required education
    pub required_education: String,
    /// Required experience
    pub experience_required: String,
    /// Salary description
    pub salary_description: String,
    /// Upper salary bound
    pub salary_high: i64,
    /// Lower salary bound
    pub salary_low: i64,
    /// Listing tags joined with ", "
    pub tags: String,
}

impl ListRecord {
    /// Column names in export order
    pub const FIELDS: [&'static str; 19] = [
        "job_id",
        "job_type",
        "job_name",
        "posting_date",
        "application_count",
        "application_description",
        "company_name",
        "company_address",
        "job_url",
        "job_analysis_url",
        "company_url",
        "longitude",
        "latitude",
        "required_education",
        "experience_required",
        "salary_description",
        "salary_high",
        "salary_low",
        "tags",
    ];
}

/// Normalized detail document of a single listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailRecord {
    /// Listing identifier from the analysis URL; empty when the board omits it
    pub job_id: String,
    /// Job title
    pub job_name: String,
    /// Company name
    pub company_name: String,
    /// Posting date
    pub posting_date: String,
    /// Job categories joined with ", "
    pub job_category: String,
    /// Region followed by address detail
    pub work_location: String,
    /// Salary text
    pub salary: String,
    /// "full-time", "part-time", or empty when unknown
    pub job_type: String,
    /// Working hours
    pub work_period: String,
    /// Required work experience
    pub work_exp: String,
    /// Required education
    pub education: String,
    /// Required skills joined with ", "
    pub required_skills: String,
    /// Required certificates joined with ", "
    pub required_certificates: String,
    /// Welfare tags joined with ", "
    pub welfare_tags: String,
    /// Statutory welfare tags joined with ", "
    pub legal_tags: String,
    /// Free-form job description
    pub job_description: String,
    /// Recruiter name
    pub hr_name: String,
    /// Contact email
    pub contact_email: String,
    /// Contact phone numbers joined with ", "
    pub contact_phone: String,
    /// Industry description
    pub industry: String,
    /// Company head count description
    pub company_size: String,
    /// Number of openings
    pub needed_employees: String,
    /// Management responsibility
    pub manage_responsibility: String,
    /// Business travel requirement
    pub business_trip: String,
    /// Postal code of the workplace
    pub postal_code: String,
    /// Listing close date
    pub close_date: String,
    /// Company number
    pub cust_no: String,
    /// Industry code
    pub industry_no: String,
    /// Whether the company is registered as a mainland-China corporation
    pub china_corp: bool,
}

impl DetailRecord {
    /// Column names in export order
    pub const FIELDS: [&'static str; 29] = [
        "job_id",
        "job_name",
        "company_name",
        "posting_date",
        "job_category",
        "work_location",
        "salary",
        "job_type",
        "work_period",
        "work_exp",
        "education",
        "required_skills",
        "required_certificates",
        "welfare_tags",
        "legal_tags",
        "job_description",
        "hr_name",
        "contact_email",
        "contact_phone",
        "industry",
        "company_size",
        "needed_employees",
        "manage_responsibility",
        "business_trip",
        "postal_code",
        "close_date",
        "cust_no",
        "industry_no",
        "china_corp",
    ];
}
