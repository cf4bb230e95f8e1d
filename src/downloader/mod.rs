//! Fetch orchestration
//!
//! This module provides the bounded, failure-tolerant engine that turns a
//! [`QuerySpec`](crate::query::QuerySpec) into normalized records.
//!
//! # Overview
//!
//! 1. **Listing**: [`ListCollector`] dispatches every page the result cap
//!    needs and stops consuming once the cap is reached
//! 2. **Normalization**: each raw item becomes a [`ListRecord`](crate::ListRecord)
//! 3. **Details**: [`DetailCollector`] fetches every listing's detail document
//! 4. **Throttling**: all requests of a run share one [`RequestThrottle`]
//!
//! # Quick Start
//!
//! ```no_run
//! use job_listing_downloader::downloader::{Pipeline, PipelineConfig, ThrottleConfig};
//! use job_listing_downloader::query::QuerySpec;
//! use std::num::NonZeroU32;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default().with_throttle(ThrottleConfig::default());
//! let outcome = Pipeline::with_config(config)
//!     .run(QuerySpec::new("data engineer", NonZeroU32::new(60).unwrap()))
//!     .await?;
//! for failure in &outcome.errors {
//!     eprintln!("{failure}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - Page and detail failures are [`FetchError`](crate::fetcher::FetchError)
//!   values collected next to the records; they never abort a run
//! - A list item missing a required field aborts the run with
//!   [`DownloadError::Shape`]
//! - Missing detail fields are not errors; they default to empty values
//!
//! No layer retries. A failed request produces exactly one error.

pub mod config;
pub mod detail_collector;
pub mod list_collector;
pub mod pipeline;
pub mod progress;
pub mod rate_limit;

pub use config::{PipelineConfig, ThrottleConfig};
pub use detail_collector::{DetailCollection, DetailCollector};
pub use list_collector::{ListCollection, ListCollector};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use progress::{NoProgress, ProgressReporter, Stage};
pub use rate_limit::{RateLimitError, RequestThrottle, ThrottlePermit};

use crate::transform::TransformError;

/// Fatal pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A listing item broke the expected shape
    #[error("unexpected listing shape: {0}")]
    Shape(#[from] TransformError),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}
