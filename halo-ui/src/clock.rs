//! Media time sources.
//!
//! Layers and animations measure time in seconds as `f64`. The global time
//! line comes from a [`MediaClock`]; layers derive their local time from it.

use std::{sync::Arc, time::Instant};

use parking_lot::RwLock;

/// A monotonic time line in seconds.
pub trait MediaClock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock media time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaClock for SystemClock {
    fn now(&self) -> f64 {
        Instant::now()
            .saturating_duration_since(self.origin)
            .as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time line, so a test can hand one clone to a widget
/// and keep another to drive it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<RwLock<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Moves the clock forward by `seconds`. Negative steps are ignored.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            *self.now.write() += seconds;
        }
    }

    /// Jumps to `time` if it is not earlier than the current time.
    pub fn set(&self, time: f64) {
        let mut now = self.now.write();
        if time > *now {
            *now = time;
        }
    }
}

impl MediaClock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();
        handle.advance(0.5);
        assert_eq!(clock.now(), 1.5);
    }

    #[test]
    fn manual_clock_never_runs_backwards() {
        let clock = ManualClock::new(2.0);
        clock.advance(-1.0);
        clock.set(1.0);
        assert_eq!(clock.now(), 2.0);
        clock.set(3.0);
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
