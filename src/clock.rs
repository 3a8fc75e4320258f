// Clock - injectable time source for the hysteresis hold timer
//
// The state machine only ever asks "how much time has passed", so time is
// expressed as a monotonic Duration since an arbitrary origin. Production code
// uses SystemClock (backed by Instant); tests and session replay drive a
// ManualClock so hold-timer behaviour can be exercised without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic, non-decreasing time source
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall-clock time source based on `Instant`
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

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the analyzer.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Duration) {
        let _ = self
            .micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(to_micros(delta)))
            });
    }

    /// Advance the clock by a number of seconds
    pub fn advance_secs(&self, secs: f64) {
        if let Ok(delta) = Duration::try_from_secs_f64(secs.max(0.0)) {
            self.advance(delta);
        }
    }

    /// Move the clock to `at`; earlier instants are ignored so time never runs backwards
    pub fn set(&self, at: Duration) {
        self.micros.fetch_max(to_micros(at), Ordering::SeqCst);
    }
}

fn to_micros(value: Duration) -> u64 {
    u64::try_from(value.as_micros()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_secs(1.5);
        assert_eq!(clock.now(), Duration::from_millis(1500));
    }

    #[test]
    fn test_manual_clock_never_runs_backwards() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(10));
        clock.set(Duration::from_secs(4));
        assert_eq!(clock.now(), Duration::from_secs(10));

        clock.advance_secs(-3.0);
        assert_eq!(clock.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_manual_clock_saturates_on_huge_values() {
        let clock = ManualClock::new();
        clock.advance_secs(f64::INFINITY);
        assert_eq!(clock.now(), Duration::ZERO);

        clock.set(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_micros(u64::MAX));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
