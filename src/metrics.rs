//! Request metrics for the fetch pipeline
//!
//! Uses the `metrics` facade, so every call is a no-op until a recorder is
//! installed. [`init_metrics`] installs the Prometheus exporter; the command
//! line enables it with `--metrics-addr`.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Initialize metrics with a Prometheus scrape endpoint
///
/// Idempotent: later calls return `Ok(())` without reinstalling.
///
/// # Errors
/// Returns an error if the exporter cannot bind `addr`
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "job_requests_total",
        Unit::Count,
        "Requests sent to the job board, by kind and outcome"
    );

    describe_histogram!(
        "job_request_duration_seconds",
        Unit::Seconds,
        "Request duration in seconds, by kind"
    );

    describe_counter!(
        "job_records_collected_total",
        Unit::Count,
        "Normalized records produced, by kind"
    );

    *initialized = true;
    info!("Metrics system initialized on {}", addr);
    Ok(())
}

/// Check if the metrics exporter is installed
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}

/// Kind of board request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Search result page
    ListPage,
    /// Listing detail document
    Detail,
}

impl RequestKind {
    /// Metric label value
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::ListPage => "list_page",
            RequestKind::Detail => "detail",
        }
    }
}

/// Timing and outcome of one request
pub struct RequestMetrics {
    kind: RequestKind,
    start_time: Instant,
}

impl RequestMetrics {
    /// Start timing a request
    pub fn start(kind: RequestKind) -> Self {
        Self {
            kind,
            start_time: Instant::now(),
        }
    }

    /// Record a response with a status code
    pub fn record_complete(&self, status_code: u16) {
        let outcome = if (200..300).contains(&status_code) {
            "success".to_string()
        } else {
            format!("http_{status_code}")
        };
        self.record(outcome);
    }

    /// Record a transport failure
    pub fn record_network_error(&self) {
        self.record("network_error".to_string());
    }

    /// Record an undecodable body
    pub fn record_parse_error(&self) {
        self.record("parse_error".to_string());
    }

    fn record(&self, outcome: String) {
        let duration = self.start_time.elapsed();

        counter!(
            "job_requests_total",
            "kind" => self.kind.as_str(),
            "outcome" => outcome.clone(),
        )
        .increment(1);

        histogram!(
            "job_request_duration_seconds",
            "kind" => self.kind.as_str(),
        )
        .record(duration.as_secs_f64());

        debug!(
            kind = self.kind.as_str(),
            outcome = %outcome,
            duration_ms = duration.as_millis() as u64,
            "Request recorded"
        );
    }
}

/// Record how many normalized records a stage produced
pub fn record_records_collected(kind: RequestKind, count: usize) {
    counter!(
        "job_records_collected_total",
        "kind" => kind.as_str(),
    )
    .increment(count as u64);
}
