//! Interval bookkeeping for the tick-driven broadcaster.
//!
//! The host loop calls in at whatever cadence it runs; the timer only
//! answers "has a full interval passed since the last mark?". An unset
//! baseline is modelled as `None` and is always due, so the first check
//! after a [`reset`](IntervalTimer::reset) fires immediately.

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

/// Tracks the timestamp of the last event against an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalTimer {
    last: Option<Millis>,
}

impl IntervalTimer {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Forget the baseline; the next [`is_due`](Self::is_due) returns `true`.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Record `now` as the most recent event.
    pub fn mark(&mut self, now: Millis) {
        self.last = Some(now);
    }

    /// Whether at least `interval_ms` has elapsed since the last mark.
    ///
    /// A `now` earlier than the baseline counts as zero elapsed time.
    pub fn is_due(&self, now: Millis, interval_ms: u32) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= u64::from(interval_ms),
        }
    }

    /// Timestamp of the last mark, if any.
    pub fn last(&self) -> Option<Millis> {
        self.last
    }
}
