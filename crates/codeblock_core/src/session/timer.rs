//! Owned debounce deadline for the editing flag.

use std::time::{Duration, Instant};

/// Single pending deadline that is rearmed, never stacked.
///
/// Arming replaces whatever deadline was pending, so a stale deadline from
/// an older edit can never fire after a newer one.
#[derive(Clone, Debug)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl DebounceTimer {
    /// Creates an idle timer with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            generation: 0,
        }
    }

    /// Debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arms (or rearms) the timer to fire one window after `now`.
    ///
    /// # Returns
    /// The generation of the new deadline.
    pub fn arm(&mut self, now: Instant) -> u64 {
        self.deadline = Some(now + self.window);
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Drops any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Generation of the most recent `arm`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fires the pending deadline once `now` has reached it.
    ///
    /// # Returns
    /// `true` exactly once per armed deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
