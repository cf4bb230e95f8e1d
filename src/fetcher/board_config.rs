//! Job board endpoint configuration
//!
//! Endpoint differences between production and a local mock server are purely
//! configuration: every URL is derived from one origin.

use std::time::Duration;

/// Production origin of the job board
pub const BOARD_ORIGIN: &str = "https://www.104.com.tw";

/// Search list endpoint path
pub const LIST_PATH: &str = "/jobs/search/list";

/// Referer sent with search list requests
pub const LIST_REFERER_PATH: &str = "/jobs/search/";

/// Detail endpoint path; the job identifier is appended
pub const DETAIL_PATH: &str = "/job/ajax/content/";

/// Referer path for detail requests; the job identifier is appended
pub const DETAIL_REFERER_PATH: &str = "/job/";

/// HTTP connect timeout (seconds)
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout (seconds)
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Endpoints and timeouts for one job board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Search list endpoint
    pub list_url: String,
    /// Referer for search list requests
    pub list_referer: String,
    /// Detail endpoint prefix
    pub detail_url_prefix: String,
    /// Detail referer prefix
    pub detail_referer_prefix: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl BoardConfig {
    /// Derive all endpoints from an origin such as `http://127.0.0.1:8080`
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            list_url: format!("{origin}{LIST_PATH}"),
            list_referer: format!("{origin}{LIST_REFERER_PATH}"),
            detail_url_prefix: format!("{origin}{DETAIL_PATH}"),
            detail_referer_prefix: format!("{origin}{DETAIL_REFERER_PATH}"),
            connect_timeout: Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the whole-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Detail URL for one listing
    pub fn detail_url(&self, job_id: &str) -> String {
        format!("{}{}", self.detail_url_prefix, job_id)
    }

    /// Referer for the detail request of one listing
    pub fn detail_referer(&self, job_id: &str) -> String {
        format!("{}{}", self.detail_referer_prefix, job_id)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::for_origin(BOARD_ORIGIN)
    }
}
