//! Leading-edge throttle
//!
//! The first call of a burst passes immediately. Every further call passes
//! only once `interval_ms` has elapsed since the last call that passed;
//! everything in between is dropped, never deferred.

use std::cell::Cell;

/// Rate limiter with leading-edge, no-trailing semantics
#[derive(Debug)]
pub struct Throttle {
    interval_ms: u64,
    last_fired: Cell<Option<f64>>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired: Cell::new(None),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Decide whether a call at `now_ms` passes, recording it if so
    pub fn try_fire(&self, now_ms: f64) -> bool {
        let passes = match self.last_fired.get() {
            None => true,
            Some(last) => {
                let elapsed = now_ms - last;
                // A clock that went backwards opens a new window
                elapsed < 0.0 || elapsed >= self.interval_ms as f64
            }
        };

        if passes {
            self.last_fired.set(Some(now_ms));
        } else {
            tracing::trace!(interval_ms = self.interval_ms, now_ms, "throttled");
        }
        passes
    }
}
