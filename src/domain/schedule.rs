//! Report gating for periodic temperature reports
//!
//! Timestamps are milliseconds since boot in a wrapping `u32`. Elapsed time
//! is always computed with `wrapping_sub`, so the gate keeps working across
//! the ~49.7 day timer rollover.

/// Interval gate deciding when a sensor's next periodic report is due
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSchedule {
    interval_ms: u32,
    last_report_ms: u32,
}

impl ReportSchedule {
    /// Create a schedule with `interval_ms` assigned at `now_ms`
    pub const fn new(interval_ms: u32, now_ms: u32) -> Self {
        Self {
            interval_ms,
            last_report_ms: Self::initial_last_report(interval_ms, now_ms),
        }
    }

    /// Assign a new interval
    ///
    /// A nonzero interval makes the very next check eligible; zero disables
    /// reporting and restarts the clock at `now_ms`.
    pub fn reset(&mut self, interval_ms: u32, now_ms: u32) {
        *self = Self::new(interval_ms, now_ms);
    }

    /// Configured interval in milliseconds (0 = disabled)
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Timestamp of the last report that fired
    pub const fn last_report_ms(&self) -> u32 {
        self.last_report_ms
    }

    /// Whether reporting is enabled at all
    pub const fn is_enabled(&self) -> bool {
        self.interval_ms != 0
    }

    /// Fire the gate if an interval has elapsed
    ///
    /// Returns `true` and restarts the interval at `now_ms` when at least
    /// `interval_ms` has passed since the last report. Leaves the schedule
    /// untouched when it returns `false`.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if now_ms.wrapping_sub(self.last_report_ms) >= self.interval_ms {
            self.last_report_ms = now_ms;
            return true;
        }
        false
    }

    const fn initial_last_report(interval_ms: u32, now_ms: u32) -> u32 {
        if interval_ms != 0 {
            now_ms.wrapping_sub(interval_ms)
        } else {
            now_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_fires() {
        let mut schedule = ReportSchedule::new(0, 1_000);
        assert!(!schedule.poll(1_000));
        assert!(!schedule.poll(u32::MAX));
        assert_eq!(schedule.last_report_ms(), 1_000);
    }

    #[test]
    fn test_new_interval_is_immediately_due() {
        let mut schedule = ReportSchedule::new(500, 10_000);
        assert!(schedule.poll(10_000));
        assert_eq!(schedule.last_report_ms(), 10_000);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut schedule = ReportSchedule::new(500, 0);
        assert!(schedule.poll(0));
        assert!(!schedule.poll(0));
        assert!(!schedule.poll(499));
        assert!(schedule.poll(500));
        assert!(!schedule.poll(500));
        assert!(schedule.poll(1_200));
    }

    #[test]
    fn test_failed_poll_does_not_mutate() {
        let mut schedule = ReportSchedule::new(1_000, 0);
        assert!(schedule.poll(5));
        let before = schedule;
        for now in [5, 6, 500, 1_004] {
            assert!(!schedule.poll(now));
        }
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_survives_timer_wraparound() {
        let start = u32::MAX - 100;
        let mut schedule = ReportSchedule::new(250, start);
        assert!(schedule.poll(start));
        // 50 ms after the rollover is only 151 ms elapsed
        assert!(!schedule.poll(50));
        // 149 ms after the rollover is exactly 250 ms elapsed
        assert!(schedule.poll(149));
    }

    #[test]
    fn test_reset_to_zero_restarts_clock() {
        let mut schedule = ReportSchedule::new(100, 0);
        schedule.reset(0, 7_777);
        assert!(!schedule.is_enabled());
        assert_eq!(schedule.last_report_ms(), 7_777);
    }

    #[test]
    fn test_new_at_boot_wraps_last_report() {
        let schedule = ReportSchedule::new(1_000, 0);
        assert_eq!(schedule.last_report_ms(), u32::MAX - 999);
    }
}
