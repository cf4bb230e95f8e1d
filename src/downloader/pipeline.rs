//! Pipeline orchestrator
//!
//! ListCollector, then list transform, then DetailCollector. Fetch failures
//! are returned with the records; a malformed list item aborts the run.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::downloader::config::PipelineConfig;
use crate::downloader::detail_collector::DetailCollector;
use crate::downloader::list_collector::ListCollector;
use crate::downloader::progress::{NoProgress, ProgressReporter};
use crate::downloader::DownloadError;
use crate::fetcher::{FetchError, JobBoardClient, JobSource};
use crate::metrics::{record_records_collected, RequestKind};
use crate::query::QuerySpec;
use crate::transform::RecordTransformer;
use crate::{DetailRecord, ListRecord};

/// Everything a successful run produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutcome {
    /// Normalized listings, at most `max_results`
    pub list_records: Vec<ListRecord>,
    /// Normalized details, one per listing whose detail fetch succeeded
    pub detail_records: Vec<DetailRecord>,
    /// Page failures followed by detail failures
    pub errors: Vec<FetchError>,
    /// Total-count hint reported by the board
    pub total_count: u64,
}

enum SourceMode {
    /// Fresh HTTP client per run
    PerRun(PipelineConfig),
    /// Caller-provided source shared by every run
    Shared(Arc<dyn JobSource>),
}

/// Composes the collectors into one call
pub struct Pipeline {
    mode: SourceMode,
    progress: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    /// Pipeline against the production board with default throttling
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Pipeline with custom endpoints or throttling
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            mode: SourceMode::PerRun(config),
            progress: Arc::new(NoProgress),
        }
    }

    /// Pipeline over an existing job source
    pub fn with_source(source: Arc<dyn JobSource>) -> Self {
        Self {
            mode: SourceMode::Shared(source),
            progress: Arc::new(NoProgress),
        }
    }

    /// Attach a progress reporter to both stages
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    fn source(&self) -> Result<Arc<dyn JobSource>, DownloadError> {
        match &self.mode {
            SourceMode::PerRun(config) => {
                let client = JobBoardClient::new(config)
                    .map_err(|e| DownloadError::ClientBuild(e.to_string()))?;
                Ok(Arc::new(client))
            }
            SourceMode::Shared(source) => Ok(source.clone()),
        }
    }

    /// Run one query end to end
    ///
    /// # Errors
    /// Returns [`DownloadError::Shape`] if a list item lacks a required field
    /// and [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    /// Individual page and detail failures are not errors; they are listed in
    /// [`PipelineOutcome::errors`].
    pub async fn run(&self, spec: QuerySpec) -> Result<PipelineOutcome, DownloadError> {
        let started = Instant::now();
        let source = self.source()?;

        let listing = ListCollector::new(source.clone())
            .with_progress(self.progress.clone())
            .collect(&spec)
            .await;

        let list_records = listing
            .items
            .iter()
            .map(RecordTransformer::to_list_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!(error = %e, "Listing item does not match the expected shape");
                DownloadError::Shape(e)
            })?;
        record_records_collected(RequestKind::ListPage, list_records.len());

        let job_ids: Vec<String> = list_records.iter().map(|r| r.job_id.clone()).collect();
        let details = DetailCollector::new(source)
            .with_progress(self.progress.clone())
            .collect(&job_ids)
            .await;
        record_records_collected(RequestKind::Detail, details.records.len());

        let mut errors = listing.errors;
        errors.extend(details.errors);

        info!(
            listings = list_records.len(),
            details = details.records.len(),
            errors = errors.len(),
            total_count = listing.total_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline run finished"
        );

        Ok(PipelineOutcome {
            list_records,
            detail_records: details.records,
            errors,
            total_count: listing.total_count,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
