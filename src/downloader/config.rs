//! Fetch pipeline configuration constants

use std::time::Duration;

use crate::fetcher::BoardConfig;

/// Listings per search result page, fixed by the board
pub const PAGE_SIZE: u32 = 20;

/// Maximum number of requests in flight at once
pub const MAX_IN_FLIGHT: usize = 10;

/// Lower bound of the pause after a successful list page (milliseconds)
pub const JITTER_MIN_MS: u64 = 500;

/// Upper bound of the pause after a successful list page (milliseconds)
pub const JITTER_MAX_MS: u64 = 1500;

/// Number of pages needed to satisfy `max_results`
///
/// `ceil(max_results / PAGE_SIZE)`; zero results need zero pages.
pub fn pages_to_fetch(max_results: u32) -> u32 {
    max_results.div_ceil(PAGE_SIZE)
}

/// Concurrency cap and post-success pause range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Permits available to concurrent requests
    pub max_in_flight: usize,
    /// Shortest pause
    pub jitter_min: Duration,
    /// Longest pause
    pub jitter_max: Duration,
}

impl ThrottleConfig {
    /// Create a config; `max_in_flight` is raised to at least 1 and the
    /// jitter bounds are swapped if given in the wrong order
    pub fn new(max_in_flight: usize, jitter_min: Duration, jitter_max: Duration) -> Self {
        let (jitter_min, jitter_max) = if jitter_min <= jitter_max {
            (jitter_min, jitter_max)
        } else {
            (jitter_max, jitter_min)
        };
        Self {
            max_in_flight: max_in_flight.max(1),
            jitter_min,
            jitter_max,
        }
    }

    /// Same concurrency cap, no pause
    pub fn without_jitter(self) -> Self {
        Self {
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
            ..self
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self::new(
            MAX_IN_FLIGHT,
            Duration::from_millis(JITTER_MIN_MS),
            Duration::from_millis(JITTER_MAX_MS),
        )
    }
}

/// Everything one pipeline run needs besides the query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Board endpoints and timeouts
    pub board: BoardConfig,
    /// Concurrency and pacing
    pub throttle: ThrottleConfig,
}

impl PipelineConfig {
    /// Config pointing at another origin, e.g. a local mock server
    pub fn for_origin(origin: &str) -> Self {
        Self {
            board: BoardConfig::for_origin(origin),
            throttle: ThrottleConfig::default(),
        }
    }

    /// Replace the throttle settings
    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }
}
