//! Job board HTTP helper
//!
//! Every request goes through [`BoardHttpClient::get_data`], which:
//! - holds one throttle permit for the whole call
//! - sends a random User-Agent and the caller's Referer
//! - classifies non-2xx statuses, transport failures and bad JSON as [`FetcherError`]
//! - unwraps the `{ "data": ... }` envelope and decodes its payload
//! - paces only after the payload decoded, so every failure returns at once
//!
//! There is no retry: a failed request is reported once and left alone.

use reqwest::header::{REFERER, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::downloader::rate_limit::RequestThrottle;
use crate::fetcher::user_agents::random_user_agent;
use crate::fetcher::{FetcherError, FetcherResult};
use crate::metrics::{RequestKind, RequestMetrics};

/// Longest error body kept in a [`FetcherError::HttpStatus`]
const MAX_ERROR_BODY_CHARS: usize = 200;

/// What to do with the permit after a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Release immediately
    Immediate,
    /// Sleep a random jitter while still holding the permit
    JitterAfterSuccess,
}

/// One GET request against the board
#[derive(Debug, Clone, Copy)]
pub struct BoardRequest<'a> {
    /// Absolute URL
    pub url: &'a str,
    /// Query parameters
    pub params: &'a [(String, String)],
    /// Referer header value
    pub referer: &'a str,
    /// Request kind, for metrics and logs
    pub kind: RequestKind,
    /// Post-success pacing
    pub pace: Pace,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
}

/// Throttled HTTP client shared by the page and detail fetchers
pub struct BoardHttpClient {
    client: Client,
    throttle: Arc<RequestThrottle>,
}

impl BoardHttpClient {
    /// Wrap a client and the run's throttle
    pub fn new(client: Client, throttle: Arc<RequestThrottle>) -> Self {
        Self { client, throttle }
    }

    /// Execute one GET and decode the envelope's `data` value with `decode`
    ///
    /// An absent or `null` `data` key reaches `decode` as [`Value::Null`];
    /// callers decide what an empty payload means. The post-success pause
    /// runs only once `decode` has succeeded.
    ///
    /// # Errors
    /// Returns [`FetcherError`] on network failure, non-2xx status,
    /// undecodable body or a `decode` failure
    pub async fn get_data<T, F>(&self, request: BoardRequest<'_>, decode: F) -> FetcherResult<T>
    where
        F: FnOnce(Value) -> FetcherResult<T>,
    {
        let permit = self
            .throttle
            .acquire()
            .await
            .map_err(|e| FetcherError::ThrottleError(e.to_string()))?;

        let metrics = RequestMetrics::start(request.kind);
        debug!(
            kind = request.kind.as_str(),
            url = %request.url,
            params = request.params.len(),
            "Sending GET request"
        );

        let response = match self
            .client
            .get(request.url)
            .query(request.params)
            .header(USER_AGENT, random_user_agent())
            .header(REFERER, request.referer)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                metrics.record_network_error();
                return Err(FetcherError::NetworkError(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            metrics.record_complete(status.as_u16());
            let body = response.text().await.unwrap_or_default();
            return Err(FetcherError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                metrics.record_network_error();
                return Err(FetcherError::NetworkError(e.to_string()));
            }
        };

        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                metrics.record_parse_error();
                return Err(FetcherError::ParseError(format!(
                    "Failed to deserialize response: {e}"
                )));
            }
        };

        let payload = match decode(envelope.data) {
            Ok(payload) => payload,
            Err(e) => {
                metrics.record_parse_error();
                return Err(e);
            }
        };

        metrics.record_complete(status.as_u16());

        if request.pace == Pace::JitterAfterSuccess {
            let delay = self.throttle.pause().await;
            debug!(delay_ms = delay.as_millis() as u64, "Paused after successful request");
        }
        permit.release();

        Ok(payload)
    }
}
