//! Search result collection across pages
//!
//! All pages the result cap needs are dispatched up front, each on its own
//! task. A single draining loop consumes completions in whatever order they
//! arrive and is the only writer of the item and error accumulators. Once
//! enough items are in, the loop stops; tasks still running are detached and
//! their results discarded.

use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::downloader::config::pages_to_fetch;
use crate::downloader::progress::{NoProgress, ProgressReporter, Stage};
use crate::fetcher::{FetchContext, FetchError, FetcherError, JobSource};
use crate::query::QuerySpec;

/// Result of collecting search pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCollection {
    /// Raw items in completion order, at most `max_results`
    pub items: Vec<Value>,
    /// Total-count hint from the last successful page
    pub total_count: u64,
    /// One entry per failed page
    pub errors: Vec<FetchError>,
    /// Pages dispatched
    pub pages_requested: u32,
}

/// Drives page fetches for one query
pub struct ListCollector {
    source: Arc<dyn JobSource>,
    progress: Arc<dyn ProgressReporter>,
}

impl ListCollector {
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

    /// Collect up to `spec.max_results()` raw listing items
    ///
    /// Failed pages are recorded and skipped; this never fails as a whole.
    /// Item order follows completion order and is not stable across runs.
    pub async fn collect(&self, spec: &QuerySpec) -> ListCollection {
        let max_results = spec.max_results() as usize;
        let pages = pages_to_fetch(spec.max_results());
        let query = Arc::new(spec.search_query());

        info!(
            keyword = spec.keyword(),
            max_results,
            pages,
            "Collecting listing pages"
        );
        self.progress.stage_started(Stage::ListPages, u64::from(pages));

        let mut pending: FuturesUnordered<_> = (1..=pages)
            .map(|page| {
                let source = self.source.clone();
                let query = query.clone();
                let handle =
                    tokio::spawn(async move { source.fetch_page(&query, page).await });
                async move { (page, handle.await) }
            })
            .collect();

        let mut collection = ListCollection {
            pages_requested: pages,
            ..ListCollection::default()
        };

        while let Some((page, joined)) = pending.next().await {
            self.progress.item_finished(Stage::ListPages);

            let result = joined.unwrap_or_else(|e| {
                Err(FetchError::new(
                    FetchContext::ListPage(page),
                    FetcherError::TaskFailed(e.to_string()),
                ))
            });

            match result {
                Ok(raw) => {
                    collection.total_count = raw.total_count;
                    collection.items.extend(raw.list);
                    if collection.items.len() >= max_results {
                        debug!(
                            collected = collection.items.len(),
                            abandoned = pending.len(),
                            "Result cap reached, no longer awaiting remaining pages"
                        );
                        break;
                    }
                }
                Err(error) => {
                    warn!(error = %error, "Failed to fetch listing page");
                    collection.errors.push(error);
                }
            }
        }

        collection.items.truncate(max_results);
        self.progress.stage_finished(Stage::ListPages);

        info!(
            items = collection.items.len(),
            total_count = collection.total_count,
            errors = collection.errors.len(),
            "Listing pages collected"
        );
        collection
    }
}
