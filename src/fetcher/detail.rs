//! Listing detail fetcher

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::board_http::{BoardHttpClient, BoardRequest, Pace};
use crate::fetcher::{BoardConfig, FetchContext, FetchError};
use crate::metrics::RequestKind;

/// Decoded detail document of one listing
///
/// Kept loosely typed: sections such as `header`, `condition`, `welfare`,
/// `jobDetail` and `contact` may be missing on any given listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetailDoc(pub Value);

impl RawDetailDoc {
    /// Wrap an envelope `data` value; `null` becomes an empty object
    pub fn from_data(data: Value) -> Self {
        match data {
            Value::Null => Self(Value::Object(Map::new())),
            other => Self(other),
        }
    }

    /// Underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for RawDetailDoc {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

/// Fetches single listing detail documents
pub struct DetailFetcher {
    http: Arc<BoardHttpClient>,
    board: Arc<BoardConfig>,
}

impl DetailFetcher {
    /// Create a fetcher over a shared HTTP client
    pub fn new(http: Arc<BoardHttpClient>, board: Arc<BoardConfig>) -> Self {
        Self { http, board }
    }

    /// Fetch the detail document for `job_id`
    ///
    /// Shares the throttle with list pages but never pauses after success.
    pub async fn fetch(&self, job_id: &str) -> Result<RawDetailDoc, FetchError> {
        let url = self.board.detail_url(job_id);
        let referer = self.board.detail_referer(job_id);

        let request = BoardRequest {
            url: &url,
            params: &[],
            referer: &referer,
            kind: RequestKind::Detail,
            pace: Pace::Immediate,
        };
        let doc = self
            .http
            .get_data(request, |data| Ok(RawDetailDoc::from_data(data)))
            .await
            .map_err(|e| FetchError::new(FetchContext::Detail(job_id.to_string()), e))?;

        debug!(job_id, "Fetched listing detail");
        Ok(doc)
    }
}
