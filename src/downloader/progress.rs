//! Progress reporting hooks for the collectors
//!
//! The collectors report one tick per finished request. Reporters must be
//! cheap: they run inside the draining loop.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Collection stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Search result pages
    ListPages,
    /// Listing detail documents
    Details,
}

impl Stage {
    /// Human-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            Stage::ListPages => "Fetching listing pages",
            Stage::Details => "Fetching listing details",
        }
    }

    /// Unit of one tick
    pub fn unit(&self) -> &'static str {
        match self {
            Stage::ListPages => "pages",
            Stage::Details => "listings",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observer of collection progress
pub trait ProgressReporter: Send + Sync {
    /// A stage starts with `total` requests
    fn stage_started(&self, _stage: Stage, _total: u64) {}

    /// One request of the stage finished, successfully or not
    fn item_finished(&self, _stage: Stage) {}

    /// The stage stopped consuming results
    fn stage_finished(&self, _stage: Stage) {}
}

/// Reporter that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Reporter that counts ticks per stage
#[derive(Debug, Default)]
pub struct CountingProgress {
    list_pages: AtomicU64,
    details: AtomicU64,
}

impl CountingProgress {
    /// Create a zeroed counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks recorded for a stage
    pub fn finished(&self, stage: Stage) -> u64 {
        self.counter(stage).load(Ordering::SeqCst)
    }

    fn counter(&self, stage: Stage) -> &AtomicU64 {
        match stage {
            Stage::ListPages => &self.list_pages,
            Stage::Details => &self.details,
        }
    }
}

impl ProgressReporter for CountingProgress {
    fn item_finished(&self, stage: Stage) {
        self.counter(stage).fetch_add(1, Ordering::SeqCst);
    }
}
