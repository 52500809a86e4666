//! Cancellable delayed tasks for coalescing bursty input
//!
//! Resize streams and thickness-slider drags would otherwise trigger an
//! expensive re-render per event. A `Debounce` holds at most one pending
//! deadline: scheduling again replaces it, and the session's poll pump fires
//! it once the quiet period has elapsed.

use std::time::{Duration, Instant};

/// One pending delayed task.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// (Re)schedules the task for `quiet` after `now`, cancelling any
    /// pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// True while a deadline is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drops the pending deadline without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true once the pending deadline has passed, clearing it. Fires
    /// at most once per schedule.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
