use std::time::Duration;

/// Host-driven, self-rescheduling timer.
///
/// The host calls `poll(now)` from its loop with a monotonic timestamp; when
/// it returns true the owner runs its step and calls `schedule_after` with the
/// delay that step computed. A cancelled timer never fires again until it is
/// re-armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepeatingTimer {
    next_due: Option<Duration>,
}

impl RepeatingTimer {
    /// A timer that is not armed.
    pub fn idle() -> Self {
        Self { next_due: None }
    }

    /// A timer that fires on the first poll at or after `at`.
    pub fn starting_at(at: Duration) -> Self {
        Self { next_due: Some(at) }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// True when armed and due. Does not re-arm.
    pub fn poll(&self, now: Duration) -> bool {
        matches!(self.next_due, Some(due) if now >= due)
    }

    /// Re-arm relative to `now`, the moment the step actually ran. A late
    /// callback therefore resumes timing from the clock instead of trying to
    /// catch up on missed steps.
    pub fn schedule_after(&mut self, now: Duration, delay: Duration) {
        self.next_due = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Time left until due, zero if overdue, None when idle.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_when_due() {
        let mut timer = RepeatingTimer::starting_at(ms(100));
        assert!(!timer.poll(ms(99)));
        assert!(timer.poll(ms(100)));

        timer.schedule_after(ms(130), ms(50));
        assert!(!timer.poll(ms(150)));
        assert!(timer.poll(ms(180)));
    }

    #[test]
    fn cancelled_never_fires() {
        let mut timer = RepeatingTimer::starting_at(ms(0));
        timer.cancel();
        assert!(!timer.poll(ms(1_000_000)));
        assert_eq!(timer.remaining(ms(0)), None);
    }

    #[test]
    fn remaining_saturates() {
        let timer = RepeatingTimer::starting_at(ms(10));
        assert_eq!(timer.remaining(ms(4)), Some(ms(6)));
        assert_eq!(timer.remaining(ms(40)), Some(Duration::ZERO));
    }
}
