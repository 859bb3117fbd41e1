// ABOUTME: Leading- and trailing-edge throttle driven by an explicit clock.
// ABOUTME: Coalesces bursts of values into at most one release per window.

use std::time::{Duration, Instant};

/// The first value in an idle period is released immediately. Values that
/// arrive before the window ends are parked, newest wins, and released by
/// [`Throttle::poll`] once the window is over; that release opens a new window.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    last_release: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_release: None,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Change the window. A parked value stays parked and follows the new deadline.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Offer a value. Returns it back if it may be applied right now.
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        match self.last_release {
            Some(last) if now.saturating_duration_since(last) < self.window => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_release = Some(now);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Release the parked value if its window has ended.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_release = Some(now);
        self.pending.take()
    }

    /// When the parked value becomes due, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_release.map(|last| last + self.window)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any parked value and forget the current window
    pub fn cancel(&mut self) -> Option<T> {
        self.last_release = None;
        self.pending.take()
    }
}
