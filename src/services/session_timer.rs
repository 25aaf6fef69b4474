use chrono::{DateTime, Utc};
use serde::Serialize;

/// Remaining-time warning never starts earlier than this many seconds before expiry.
const WARNING_CAP_SECONDS: f64 = 300.0;
const WARNING_FRACTION: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
}

/// Result of recomputing the clock, handed to whatever renders it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimerTick {
    pub display: String,
    pub elapsed_seconds: u64,
    pub remaining_seconds: Option<i64>,
    pub warning: bool,
    pub expired: bool,
    /// True only on the tick where expiry is first observed.
    pub expired_now: bool,
}

#[derive(Clone, Debug)]
pub struct SessionTimer {
    state: TimerState,
    started_at: Option<DateTime<Utc>>,
    limit_seconds: Option<u64>,
    elapsed_seconds: u64,
    warning: bool,
    expired: bool,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            started_at: None,
            limit_seconds: None,
            elapsed_seconds: 0,
            warning: false,
            expired: false,
        }
    }

    /// Starts a fresh run; a running timer is replaced, not stacked.
    pub fn start(&mut self, now: DateTime<Utc>, limit_seconds: Option<u64>) {
        self.state = TimerState::Running;
        self.started_at = Some(now);
        self.limit_seconds = limit_seconds.filter(|limit| *limit > 0);
        self.elapsed_seconds = 0;
        self.warning = false;
        self.expired = false;
    }

    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.state == TimerState::Stopped {
            return;
        }
        self.elapsed_seconds = self.elapsed_at(now);
        self.state = TimerState::Stopped;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn limit_seconds(&self) -> Option<u64> {
        self.limit_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Whether the run went past its limit; always false without one.
    pub fn time_exceeded(&self) -> bool {
        self.limit_seconds
            .is_some_and(|limit| self.elapsed_seconds > limit)
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at {
            Some(started_at) => (now - started_at).num_seconds().max(0) as u64,
            None => 0,
        }
    }

    fn warning_threshold(limit: u64) -> f64 {
        WARNING_CAP_SECONDS.min(limit as f64 * WARNING_FRACTION)
    }

    /// Recomputes elapsed/remaining at `now`. A stopped timer reports its frozen state.
    pub fn advance_clock(&mut self, now: DateTime<Utc>) -> TimerTick {
        if self.state == TimerState::Stopped {
            return self.report(false);
        }

        self.elapsed_seconds = self.elapsed_at(now);

        let mut expired_now = false;
        if let Some(limit) = self.limit_seconds {
            let remaining = limit as i64 - self.elapsed_seconds as i64;
            if remaining <= 0 {
                if !self.expired {
                    self.expired = true;
                    expired_now = true;
                    log::info!("Session time limit of {}s reached", limit);
                }
            } else if remaining as f64 <= Self::warning_threshold(limit) {
                self.warning = true;
            }
        }

        self.report(expired_now)
    }

    /// Current state without advancing the clock.
    pub fn snapshot(&self) -> TimerTick {
        self.report(false)
    }

    fn report(&self, expired_now: bool) -> TimerTick {
        let remaining_seconds = self
            .limit_seconds
            .map(|limit| limit as i64 - self.elapsed_seconds as i64);

        let display = match remaining_seconds {
            Some(remaining) => format_clock(remaining.max(0) as u64),
            None => format_clock(self.elapsed_seconds),
        };

        TimerTick {
            display,
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds,
            warning: self.warning && !self.expired,
            expired: self.expired,
            expired_now,
        }
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Compact human form used in summaries: `1h 2m 3s`, `2m 3s`, `3s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(seconds)
    }

    #[test]
    fn countdown_expires_once() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(10));

        let tick = timer.advance_clock(at(11));
        assert!(tick.remaining_seconds.unwrap() <= 0);
        assert!(tick.expired);
        assert!(tick.expired_now);
        assert_eq!(tick.display, "00:00:00");

        let tick = timer.advance_clock(at(12));
        assert!(tick.expired);
        assert!(!tick.expired_now);
    }

    #[test]
    fn elapsed_mode_counts_up() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), None);

        let tick = timer.advance_clock(at(3725));
        assert_eq!(tick.display, "01:02:05");
        assert_eq!(tick.remaining_seconds, None);
        assert!(!tick.warning && !tick.expired);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(0));

        assert_eq!(timer.limit_seconds(), None);
        assert!(!timer.advance_clock(at(100_000)).expired);
    }

    #[test]
    fn warning_uses_ten_percent_for_short_limits() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(100));

        assert!(!timer.advance_clock(at(89)).warning);
        let tick = timer.advance_clock(at(90));
        assert!(tick.warning);
        assert_eq!(tick.display, "00:00:10");
    }

    #[test]
    fn warning_is_capped_at_five_minutes() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(3600));

        assert!(!timer.advance_clock(at(3299)).warning);
        assert!(timer.advance_clock(at(3300)).warning);
    }

    #[test]
    fn warning_is_sticky_until_expiry() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(100));
        timer.advance_clock(at(95));

        // a clock that steps backwards does not clear the flag
        assert!(timer.advance_clock(at(50)).warning);

        let tick = timer.advance_clock(at(100));
        assert!(tick.expired);
        assert!(!tick.warning);
    }

    #[test]
    fn stop_freezes_elapsed_and_is_idempotent() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), None);
        timer.advance_clock(at(5));
        timer.stop(at(42));
        assert_eq!(timer.elapsed_seconds(), 42);
        assert_eq!(timer.state(), TimerState::Stopped);

        timer.stop(at(99));
        assert_eq!(timer.elapsed_seconds(), 42);

        let tick = timer.advance_clock(at(500));
        assert_eq!(tick.elapsed_seconds, 42);
    }

    #[test]
    fn restart_replaces_previous_run() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), Some(10));
        timer.advance_clock(at(20));
        assert!(timer.is_expired());

        timer.start(at(20), Some(60));
        assert!(!timer.is_expired());
        let tick = timer.advance_clock(at(30));
        assert_eq!(tick.elapsed_seconds, 10);
        assert_eq!(tick.remaining_seconds, Some(50));
    }

    #[test]
    fn time_exceeded_requires_a_limit() {
        let mut timer = SessionTimer::new();
        timer.start(t0(), None);
        timer.stop(at(1000));
        assert!(!timer.time_exceeded());

        timer.start(t0(), Some(60));
        timer.stop(at(61));
        assert!(timer.time_exceeded());
    }

    #[test]
    fn clock_before_start_counts_as_zero() {
        let mut timer = SessionTimer::new();
        timer.start(at(10), None);

        assert_eq!(timer.advance_clock(t0()).elapsed_seconds, 0);
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(3723), "1h 2m 3s");
        assert_eq!(format_duration(123), "2m 3s");
        assert_eq!(format_duration(7), "7s");
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(100 * 3600), "100:00:00");
    }
}
