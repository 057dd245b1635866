//! Search limits and wall-clock cancellation.
//!
//! The search polls `TimeControl` at node entry; once the deadline
//! passes the stop flag becomes sticky and the whole recursion unwinds.
//! Reading the clock on every node would be wasteful, so the flag is an
//! atomic that is only re-derived from the clock every `CHECK_INTERVAL`
//! nodes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How many nodes may pass between actual clock reads.
const CHECK_INTERVAL: u64 = 1024;

/// What bounds a search: a depth ceiling, an optional move time, and the
/// stop handle the two are enforced through.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum search depth in plies.
    pub depth: u8,
    /// Maximum wall-clock time for this move (None = unlimited).
    pub move_time: Option<Duration>,
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Depth-limited search with no clock.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    /// Depth- and time-limited search.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Time-limited search with no depth ceiling.
    pub fn time(move_time: Duration) -> Self {
        Self::depth_and_time(u8::MAX, move_time)
    }

    /// Start the clock. Call once when the search begins.
    pub fn start(&self) {
        self.time_control.start();
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Cheaply cloneable stop handle shared between the search and whoever
/// may want to interrupt it.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    started_at: Arc<Mutex<Option<Instant>>>,
    time_limit: Option<Duration>,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            started_at: Arc::new(Mutex::new(None)),
            time_limit,
        }
    }

    pub fn start(&self) {
        *self.lock_start() = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Force the search to stop at its next poll.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Fast sticky-flag read, safe to call on every node.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Read the clock and trip the stop flag when the limit is spent.
    /// Returns the (possibly fresh) stopped state.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(limit) = self.time_limit
            && let Some(start) = *self.lock_start()
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }
        false
    }

    /// True every `CHECK_INTERVAL` nodes; gates `check_time`.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(CHECK_INTERVAL)
    }

    /// Time since `start`, zero if the clock never started.
    pub fn elapsed(&self) -> Duration {
        self.lock_start().map(|s| s.elapsed()).unwrap_or_default()
    }

    fn lock_start(&self) -> MutexGuard<'_, Option<Instant>> {
        self.started_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
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
