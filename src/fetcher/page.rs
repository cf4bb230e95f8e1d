//! Search result page fetcher

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::board_http::{BoardHttpClient, BoardRequest, Pace};
use crate::fetcher::{BoardConfig, FetchContext, FetchError, FetcherError};
use crate::metrics::RequestKind;
use crate::query::SearchQuery;

/// One decoded page of search results
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawListPage {
    /// Total number of matching listings reported by the board
    #[serde(rename = "totalCount", default, deserialize_with = "lenient_count")]
    pub total_count: u64,
    /// Raw listing items in page order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub list: Vec<Value>,
}

impl RawListPage {
    /// Decode an envelope `data` value; `null` means an empty page
    pub fn from_data(data: Value) -> Result<Self, FetcherError> {
        if data.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(data)
            .map_err(|e| FetcherError::ParseError(format!("Invalid list page: {e}")))
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fetches single search result pages
pub struct PageFetcher {
    http: Arc<BoardHttpClient>,
    board: Arc<BoardConfig>,
}

impl PageFetcher {
    /// Create a fetcher over a shared HTTP client
    pub fn new(http: Arc<BoardHttpClient>, board: Arc<BoardConfig>) -> Self {
        Self { http, board }
    }

    /// Fetch one page (1-indexed)
    ///
    /// Holds a throttle permit for the request and for the random pause that
    /// follows a success. Failures, including a `data` value that is not a
    /// page, return at once without the pause.
    pub async fn fetch(&self, query: &SearchQuery, page: u32) -> Result<RawListPage, FetchError> {
        let params = query.page_params(page);
        let request = BoardRequest {
            url: &self.board.list_url,
            params: &params,
            referer: &self.board.list_referer,
            kind: RequestKind::ListPage,
            pace: Pace::JitterAfterSuccess,
        };
        let data = self
            .http
            .get_data(request, RawListPage::from_data)
            .await
            .map_err(|e| FetchError::new(FetchContext::ListPage(page), e))?;

        debug!(
            page,
            items = data.list.len(),
            total_count = data.total_count,
            "Fetched list page"
        );
        Ok(data)
    }
}
