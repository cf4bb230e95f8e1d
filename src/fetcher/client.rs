//! HTTP client construction
//!
//! Each pipeline run owns one `reqwest::Client`, so every page and detail
//! request of that run shares a single connection pool. The pool is released
//! when the run's last clone of the client is dropped.

use reqwest::Client;

use crate::fetcher::BoardConfig;

/// Build the HTTP client for one run
///
/// Configured with explicit timeouts so a stalled request fails instead of
/// holding a throttle permit forever.
pub fn build_http_client(board: &BoardConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(board.connect_timeout)
        .timeout(board.request_timeout)
        .build()
}
