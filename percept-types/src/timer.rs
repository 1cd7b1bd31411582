use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of "now" for timers.
///
/// Timers read the clock instead of `Instant::now()` directly so tests can
/// move time forward deterministically with a [`ManualClock`].
pub trait Clock: Debug + Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }

    /// Move the clock forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + offset
    }
}

/// Wall-clock stopwatch.
///
/// A timer is either uninitialized or holds the instant it was started at.
/// Elapsed queries on an uninitialized timer return NaN, so comparisons
/// against limits are simply false until the timer runs.
#[derive(Debug, Clone)]
pub struct Timer {
    clock: Arc<dyn Clock>,
    begin: Option<Instant>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create an uninitialized timer on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an uninitialized timer reading the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock, begin: None }
    }

    /// Whether the timer has a reference instant.
    pub fn is_initialized(&self) -> bool {
        self.begin.is_some()
    }

    /// Record "now" as the reference instant. Re-arms a running timer.
    pub fn start(&mut self) {
        self.begin = Some(self.clock.now());
    }

    /// Same as [`Timer::start`].
    pub fn reset(&mut self) {
        self.start();
    }

    /// Clear the reference instant.
    pub fn abort(&mut self) {
        self.begin = None;
    }

    /// Time since `start`, or `None` when uninitialized.
    pub fn elapsed(&self) -> Option<Duration> {
        self.begin
            .map(|begin| self.clock.now().saturating_duration_since(begin))
    }

    /// Milliseconds since `start`, NaN when uninitialized.
    pub fn milliseconds_passed(&self) -> f64 {
        self.elapsed()
            .map_or(f64::NAN, |elapsed| elapsed.as_nanos() as f64 / 1_000_000.0)
    }

    /// Seconds since `start`, NaN when uninitialized.
    pub fn seconds_passed(&self) -> f64 {
        self.milliseconds_passed() / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual() -> (Arc<ManualClock>, Timer) {
        let clock = Arc::new(ManualClock::new());
        let timer = Timer::with_clock(clock.clone());
        (clock, timer)
    }

    #[test]
    fn uninitialized_is_nan() {
        let (_, timer) = manual();
        assert!(!timer.is_initialized());
        assert!(timer.milliseconds_passed().is_nan());
        assert!(timer.seconds_passed().is_nan());
        assert_eq!(timer.elapsed(), None);
    }

    #[test]
    fn elapsed_after_start() {
        let (clock, mut timer) = manual();
        timer.start();
        assert_eq!(timer.seconds_passed(), 0.0);

        clock.advance_millis(1500);
        assert_eq!(timer.milliseconds_passed(), 1500.0);
        assert_eq!(timer.seconds_passed(), 1.5);
    }

    #[test]
    fn monotonic_until_abort() {
        let (clock, mut timer) = manual();
        timer.start();
        let mut last = timer.seconds_passed();
        for _ in 0..5 {
            clock.advance_millis(250);
            let now = timer.seconds_passed();
            assert!(now >= last);
            last = now;
        }

        timer.abort();
        assert!(timer.seconds_passed().is_nan());
    }

    #[test]
    fn reset_rearms() {
        let (clock, mut timer) = manual();
        timer.start();
        clock.advance_millis(3000);
        timer.reset();
        assert_eq!(timer.milliseconds_passed(), 0.0);
        clock.advance_millis(10);
        assert_eq!(timer.milliseconds_passed(), 10.0);
    }

    #[test]
    fn system_clock_is_non_negative() {
        let mut timer = Timer::new();
        timer.start();
        assert!(timer.seconds_passed() >= 0.0);
    }
}
