//! Clock capability
//!
//! Timestamps are milliseconds as `f64`. The trigger only ever compares
//! timestamps from the same clock, so the epoch is irrelevant.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`SystemTime`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Manually advanced clock for deterministic tests and simulations
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move the clock forward (or backward, with a negative delta)
    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1000.0);
        let other = clock.clone();

        clock.advance(16.0);
        assert_eq!(other.now_ms(), 1016.0);

        other.set(5.0);
        assert_eq!(clock.now_ms(), 5.0);
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a > 0.0);
        assert!(b >= a);
    }
}
