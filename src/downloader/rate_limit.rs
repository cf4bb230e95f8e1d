//! Request throttle
//!
//! Caps the number of in-flight requests with a counting semaphore and spaces
//! successful list pages with a random pause.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::sleep;

use crate::downloader::config::ThrottleConfig;

/// Shared concurrency budget for one pipeline run
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    semaphore: Arc<Semaphore>,
    config: ThrottleConfig,
}

/// One unit of the concurrency budget; released on drop
#[derive(Debug)]
pub struct ThrottlePermit {
    _permit: OwnedSemaphorePermit,
}

impl ThrottlePermit {
    /// Give the permit back
    pub fn release(self) {}
}

impl RequestThrottle {
    /// Create a throttle from its configuration
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_in_flight)),
            config,
        }
    }

    /// Wait until fewer than `max_in_flight` permits are held, then take one
    pub async fn acquire(&self) -> Result<ThrottlePermit, RateLimitError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RateLimitError::AcquireError(e.to_string()))?;
        Ok(ThrottlePermit { _permit: permit })
    }

    /// Random pause length within the configured bounds
    pub fn jitter(&self) -> Duration {
        let min = self.config.jitter_min.as_millis() as u64;
        let max = self.config.jitter_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    /// Sleep for a random jitter and return how long it slept
    pub async fn pause(&self) -> Duration {
        let delay = self.jitter();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        delay
    }

    /// Permits not currently held
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Configured concurrency cap
    pub fn max_in_flight(&self) -> usize {
        self.config.max_in_flight
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

/// Throttle errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Semaphore closed
    #[error("failed to acquire request permit: {0}")]
    AcquireError(String),
}
