//! Autoplay timer
//!
//! The scheduler does not own a thread or a runtime. The engine asks it on
//! every tick whether a period boundary has passed.

use std::time::Duration;

/// Cancelable periodic timer measured on the engine clock
#[derive(Debug, Clone, Default)]
pub struct AutoplayScheduler {
    period: Duration,
    next_due: Option<Duration>,
}

impl AutoplayScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start firing every `period` from `now`; keeps the existing phase if running
    pub fn start(&mut self, now: Duration, period: Duration) {
        if self.is_running() {
            return;
        }
        self.period = period;
        self.next_due = Some(now + period);
    }

    /// Cancel and start again with a fresh phase
    pub fn restart(&mut self, now: Duration, period: Duration) {
        self.cancel();
        self.start(now, period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_due
    }

    /// Returns true at most once per call when a period boundary has passed
    ///
    /// Boundaries missed between two calls are absorbed: the next deadline
    /// becomes the first boundary strictly after `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        if self.period.is_zero() {
            self.next_due = Some(now);
            return true;
        }
        let behind = (now - due).as_nanos() / self.period.as_nanos();
        let skipped = u32::try_from(behind + 1).unwrap_or(u32::MAX);
        self.next_due = Some(due + self.period * skipped);
        true
    }
}
