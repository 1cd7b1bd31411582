use std::sync::Arc;

use crate::{Clock, Timer};

/// What a frontend needs to draw a time bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeBarState {
    /// Elapsed time relative to the duration, in percent. Not capped at 100.
    pub progress_percent: f64,

    /// Whether the duration has been reached.
    pub exceeding: bool,

    /// Whether the bar should animate between updates.
    pub smooth: bool,

    /// Human-readable "Time taken" text, empty during the first second.
    pub label: String,
}

/// Per-question countdown indicator driven by its own [`Timer`].
///
/// The owner calls [`TimeBar::update`] once per frame and renders
/// [`TimeBar::state`].
#[derive(Debug, Clone)]
pub struct TimeBar {
    timer: Timer,
    duration_seconds: u32,
    state: TimeBarState,
}

impl TimeBar {
    /// Create a time bar on the system clock.
    pub fn new(duration_seconds: u32) -> Self {
        Self::from_timer(Timer::new(), duration_seconds)
    }

    /// Create a time bar reading the given clock.
    pub fn with_clock(duration_seconds: u32, clock: Arc<dyn Clock>) -> Self {
        Self::from_timer(Timer::with_clock(clock), duration_seconds)
    }

    fn from_timer(timer: Timer, duration_seconds: u32) -> Self {
        Self {
            timer,
            duration_seconds,
            state: TimeBarState::default(),
        }
    }

    /// The configured limit in seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// The current render state.
    pub fn state(&self) -> &TimeBarState {
        &self.state
    }

    /// Whether the internal timer is running.
    pub fn is_running(&self) -> bool {
        self.timer.is_initialized()
    }

    /// Empty the bar and stop the timer. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.state = TimeBarState::default();
        self.timer.abort();
    }

    /// Start timing and switch to smooth animation.
    pub fn start(&mut self) {
        self.timer.start();
        self.state.smooth = true;
    }

    /// Recompute progress, the exceeding flag and the label.
    pub fn update(&mut self) {
        if !self.timer.is_initialized() {
            self.reset();
            return;
        }

        let milliseconds = self.timer.milliseconds_passed();
        let seconds = self.timer.seconds_passed().floor() as u64;
        let limit = u64::from(self.duration_seconds);

        let exceeding = seconds >= limit;
        self.state.progress_percent =
            milliseconds * 100.0 / (f64::from(self.duration_seconds) * 1000.0);
        self.state.exceeding = exceeding;

        self.state.label = if seconds == 0 {
            String::new()
        } else if exceeding {
            format!("Time taken: More than {limit} seconds!")
        } else {
            let plural = if seconds > 1 { "s" } else { "" };
            format!("Time taken: {seconds} second{plural}")
        };
    }

    /// Detach the bar. Consumes it so it cannot be updated again.
    pub fn destroy(self) {
        tracing::debug!(duration = self.duration_seconds, "time bar destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn bar(duration: u32) -> (Arc<ManualClock>, TimeBar) {
        let clock = Arc::new(ManualClock::new());
        let bar = TimeBar::with_clock(duration, clock.clone());
        (clock, bar)
    }

    #[test]
    fn update_before_start_stays_empty() {
        let (clock, mut bar) = bar(5);
        clock.advance_millis(2000);
        bar.update();
        assert_eq!(bar.state(), &TimeBarState::default());
    }

    #[test]
    fn first_second_has_no_label() {
        let (clock, mut bar) = bar(5);
        bar.start();
        clock.advance_millis(500);
        bar.update();
        assert_eq!(bar.state().label, "");
        assert_eq!(bar.state().progress_percent, 10.0);
        assert!(bar.state().smooth);
        assert!(!bar.state().exceeding);
    }

    #[test]
    fn singular_and_plural_labels() {
        let (clock, mut bar) = bar(5);
        bar.start();

        clock.advance_millis(1000);
        bar.update();
        assert_eq!(bar.state().label, "Time taken: 1 second");

        clock.advance_millis(2500);
        bar.update();
        assert_eq!(bar.state().label, "Time taken: 3 seconds");
        assert_eq!(bar.state().progress_percent, 70.0);
    }

    #[test]
    fn exceeding_after_duration() {
        for duration in [1, 2, 6, 30] {
            let (clock, mut bar) = bar(duration);
            bar.start();
            clock.advance_millis(u64::from(duration) * 1000);
            bar.update();
            assert!(bar.state().exceeding);
            assert_eq!(
                bar.state().label,
                format!("Time taken: More than {duration} seconds!")
            );
        }
    }

    #[test]
    fn progress_is_not_capped() {
        let (clock, mut bar) = bar(2);
        bar.start();
        clock.advance_millis(3000);
        bar.update();
        assert_eq!(bar.state().progress_percent, 150.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let (clock, mut bar) = bar(2);
        bar.start();
        clock.advance_millis(3000);
        bar.update();

        bar.reset();
        bar.reset();
        assert!(!bar.is_running());
        assert_eq!(bar.state(), &TimeBarState::default());
    }
}
