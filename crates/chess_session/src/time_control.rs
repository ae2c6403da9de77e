//! Deadline tracking for move providers.
//!
//! The session starts a [`TimeControl`] right before asking a provider for a
//! move and checks it again when the answer comes back. Providers that search
//! for a while can poll [`TimeControl::check_time`] to give up early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Thread-safe stop flag plus an optional time limit.
///
/// Cheap to clone; clones share the flag and the start instant, so a provider
/// may hand a copy to worker threads.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    /// When the clock was started
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Time allowed (None = infinite)
    time_limit: Option<Duration>,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
        }
    }

    /// Start (or restart) the clock and clear the stop flag.
    pub fn start(&self) {
        let mut start = self
            .start_time
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *start = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Force the deadline to count as passed.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Fast atomic load, suitable for calling in a tight loop.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Check the clock and set the stop flag if the limit has passed.
    /// Returns whether the caller should stop.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit {
            if self.started_at().is_some() && self.elapsed() >= limit {
                self.stop();
                return true;
            }
        }

        false
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Elapsed time since `start`, zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.started_at()
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Remaining time (None if there is no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn started_at(&self) -> Option<Instant> {
        *self
            .start_time
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
