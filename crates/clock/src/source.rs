use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from probing a reference time source.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("time source unreachable: {0}")]
    Unreachable(String),
    #[error("response has no Date header")]
    MissingDate,
    #[error("malformed Date header: {0:?}")]
    MalformedDate(String),
}

/// The local wall clock, in seconds.
pub trait LocalClock {
    fn now_secs(&self) -> f64;
}

/// A trusted remote clock reached by one round trip.
pub trait ReferenceSource {
    /// Reference time in seconds since the Unix epoch.
    fn probe(&mut self) -> Result<f64, ClockError>;
}

/// Seconds since the Unix epoch from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl LocalClock for SystemClock {
    fn now_secs(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A hand-driven clock for tests and headless replays.
///
/// Clones share the same time, so a test can keep one handle and advance it
/// while a controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_secs)),
        }
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl LocalClock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();
        handle.advance(0.5);
        assert_eq!(clock.now_secs(), 10.5);
        handle.set(3.0);
        assert_eq!(clock.now_secs(), 3.0);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_secs() > 1_600_000_000.0);
    }
}
