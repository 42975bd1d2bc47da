//! Periodic refresh timer.

use std::time::{Duration, Instant};

/// Tracks when the next periodic refresh is due.
///
/// A period of zero disables the timer; every edit is then rendered
/// immediately instead. Changing the period cancels the pending deadline and
/// starts a new one from the time of the change.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
/// use lorecraft::RefreshSchedule;
///
/// let start = Instant::now();
/// let mut schedule = RefreshSchedule::new(2, start);
/// assert!(!schedule.poll(start + Duration::from_secs(1)));
/// assert!(schedule.poll(start + Duration::from_secs(2)));
/// ```
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    /// `None` when periodic refresh is disabled
    period: Option<Duration>,
    /// Deadline of the next tick
    next_due: Option<Instant>,
    /// Ticks fired since the period was last set
    ticks: u64,
}

impl RefreshSchedule {
    /// A schedule firing every `period_secs` seconds from `now`.
    pub fn new(period_secs: u32, now: Instant) -> Self {
        let mut schedule = Self {
            period: None,
            next_due: None,
            ticks: 0,
        };
        schedule.set_period(period_secs, now);
        schedule
    }

    /// Replace the period, cancelling the pending deadline.
    pub fn set_period(&mut self, period_secs: u32, now: Instant) {
        self.period = (period_secs > 0).then(|| Duration::from_secs(period_secs as u64));
        self.next_due = self.period.map(|period| now + period);
        self.ticks = 0;
        match self.period {
            Some(period) => tracing::debug!("Refresh timer set to {:?}", period),
            None => tracing::debug!("Refresh timer disabled"),
        }
    }

    #[inline]
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// True when there is no timer and edits should render right away.
    #[inline]
    pub fn is_immediate(&self) -> bool {
        self.period.is_none()
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a tick is due at `now`. Fires at most once per call; missed
    /// ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(period), Some(due)) = (self.period, self.next_due) else {
            return false;
        };
        if now < due {
            return false;
        }

        // Skip whole periods that passed without a poll.
        let behind = now.duration_since(due);
        let skipped = (behind.as_nanos() / period.as_nanos()) as u32;
        self.next_due = Some(due + period * (skipped + 1));
        self.ticks += 1;
        true
    }

    /// Time left until the next tick, `None` when the timer is off.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_never_fires() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(0, start);
        assert!(schedule.is_immediate());
        assert!(!schedule.poll(start + Duration::from_secs(60)));
        assert_eq!(schedule.time_until_next(start), None);
    }

    #[test]
    fn test_fires_once_per_period() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(2, start);
        assert!(!schedule.poll(start + Duration::from_millis(1999)));
        assert!(schedule.poll(start + Duration::from_secs(2)));
        assert!(!schedule.poll(start + Duration::from_secs(3)));
        assert!(schedule.poll(start + Duration::from_secs(4)));
        assert_eq!(schedule.ticks(), 2);
    }

    #[test]
    fn test_missed_ticks_collapse() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(1, start);
        assert!(schedule.poll(start + Duration::from_millis(5500)));
        assert!(!schedule.poll(start + Duration::from_millis(5900)));
        assert_eq!(
            schedule.time_until_next(start + Duration::from_millis(5500)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_set_period_restarts_deadline() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(2, start);
        let later = start + Duration::from_secs(1);
        schedule.set_period(5, later);
        assert!(!schedule.poll(start + Duration::from_secs(2)));
        assert!(schedule.poll(later + Duration::from_secs(5)));

        schedule.set_period(0, later);
        assert!(schedule.is_immediate());
        assert_eq!(schedule.ticks(), 0);
    }
}
