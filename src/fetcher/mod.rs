//! HTTP fetchers for the job board
//!
//! [`JobSource`] is the seam between the collectors and the network. The
//! production implementation is [`JobBoardClient`], which pairs a
//! [`page::PageFetcher`] with a [`detail::DetailFetcher`] over one shared
//! HTTP client and one shared [`RequestThrottle`](crate::downloader::RequestThrottle).

use crate::downloader::config::PipelineConfig;
use crate::downloader::RequestThrottle;
use crate::query::SearchQuery;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub mod board_config;
pub mod board_http;
pub mod client;
pub mod detail;
pub mod page;
pub mod user_agents;

pub use board_config::BoardConfig;
pub use detail::{DetailFetcher, RawDetailDoc};
pub use page::{PageFetcher, RawListPage};

/// Failure of a single request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetcherError {
    /// Non-2xx response
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Connection, timeout or body transfer failure
    #[error("network error: {0}")]
    NetworkError(String),

    /// Body was not the expected JSON envelope
    #[error("parse error: {0}")]
    ParseError(String),

    /// Throttle could not hand out a permit
    #[error("throttle error: {0}")]
    ThrottleError(String),

    /// Request task panicked or was aborted
    #[error("request task failed: {0}")]
    TaskFailed(String),
}

/// Result type for single requests
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Which request failed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchContext {
    /// One page of search results (1-indexed)
    ListPage(u32),
    /// Detail document of one listing
    Detail(String),
}

impl fmt::Display for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchContext::ListPage(page) => write!(f, "list page {page}"),
            FetchContext::Detail(job_id) => write!(f, "detail {job_id}"),
        }
    }
}

/// A recorded, non-fatal fetch failure
///
/// Failures never abort sibling requests; the collectors gather them and the
/// pipeline returns them next to whatever succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{context}: {error}")]
pub struct FetchError {
    /// Request that failed
    pub context: FetchContext,
    /// Why it failed
    pub error: FetcherError,
}

impl FetchError {
    /// Attach a context to a request failure
    pub fn new(context: FetchContext, error: FetcherError) -> Self {
        Self { context, error }
    }

    /// Context label, e.g. "list page 2"
    pub fn label(&self) -> String {
        self.context.to_string()
    }

    /// Underlying message
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl serde::Serialize for FetchError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("FetchError", 2)?;
        state.serialize_field("context", &self.label())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// Source of list pages and detail documents
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch one page of search results (1-indexed)
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<RawListPage, FetchError>;

    /// Fetch the detail document of one listing
    async fn fetch_detail(&self, job_id: &str) -> Result<RawDetailDoc, FetchError>;
}

/// HTTP-backed [`JobSource`] for one pipeline run
pub struct JobBoardClient {
    pages: PageFetcher,
    details: DetailFetcher,
}

impl JobBoardClient {
    /// Build a fresh HTTP client and throttle from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, reqwest::Error> {
        let http_client = client::build_http_client(&config.board)?;
        let throttle = Arc::new(RequestThrottle::new(config.throttle.clone()));
        Ok(Self::with_parts(http_client, config.board.clone(), throttle))
    }

    /// Assemble from an existing client and throttle
    pub fn with_parts(
        http_client: reqwest::Client,
        board: BoardConfig,
        throttle: Arc<RequestThrottle>,
    ) -> Self {
        let http = Arc::new(board_http::BoardHttpClient::new(http_client, throttle));
        let board = Arc::new(board);
        Self {
            pages: PageFetcher::new(http.clone(), board.clone()),
            details: DetailFetcher::new(http, board),
        }
    }
}

#[async_trait]
impl JobSource for JobBoardClient {
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<RawListPage, FetchError> {
        self.pages.fetch(query, page).await
    }

    async fn fetch_detail(&self, job_id: &str) -> Result<RawDetailDoc, FetchError> {
        self.details.fetch(job_id).await
    }
}
