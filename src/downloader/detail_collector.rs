//! Detail collection for a batch of listings
//!
//! One task per identifier, all dispatched at once and bounded only by the
//! shared throttle. Every identifier is attempted; there is no early stop.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use crate::downloader::progress::{NoProgress, ProgressReporter, Stage};
use crate::fetcher::{FetchContext, FetchError, FetcherError, JobSource};
use crate::transform::RecordTransformer;
use crate::DetailRecord;

/// Result of collecting detail documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailCollection {
    /// Normalized records in completion order
    pub records: Vec<DetailRecord>,
    /// One entry per failed identifier
    pub errors: Vec<FetchError>,
}

/// Drives detail fetches for a list of identifiers
pub struct DetailCollector {
    source: Arc<dyn JobSource>,
    progress: Arc<dyn ProgressReporter>,
}

impl DetailCollector {
    /// Create a collector over a job source
    pub fn new(source: Arc<dyn JobSource>) -> Self {
        Self {
            source,
            progress: Arc::new(NoProgress),
        }
    }

    /// Attach a progress reporter
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch and normalize the detail document of every identifier
    ///
    /// For N identifiers of which K fail, returns N-K records and K errors.
    pub async fn collect(&self, job_ids: &[String]) -> DetailCollection {
        info!(listings = job_ids.len(), "Collecting listing details");
        self.progress
            .stage_started(Stage::Details, job_ids.len() as u64);

        let mut pending: FuturesUnordered<_> = job_ids
            .iter()
            .map(|job_id| {
                let source = self.source.clone();
                let task_id = job_id.clone();
                let handle =
                    tokio::spawn(async move { source.fetch_detail(&task_id).await });
                let job_id = job_id.clone();
                async move { (job_id, handle.await) }
            })
            .collect();

        let mut collection = DetailCollection {
            records: Vec::with_capacity(job_ids.len()),
            errors: Vec::new(),
        };

        while let Some((job_id, joined)) = pending.next().await {
            self.progress.item_finished(Stage::Details);

            let result = joined.unwrap_or_else(|e| {
                Err(FetchError::new(
                    FetchContext::Detail(job_id),
                    FetcherError::TaskFailed(e.to_string()),
                ))
            });

            match result {
                Ok(doc) => collection
                    .records
                    .push(RecordTransformer::to_detail_record(&doc)),
                Err(error) => {
                    warn!(error = %error, "Failed to fetch listing detail");
                    collection.errors.push(error);
                }
            }
        }

        self.progress.stage_finished(Stage::Details);
        info!(
            records = collection.records.len(),
            errors = collection.errors.len(),
            "Listing details collected"
        );
        collection
    }
}
