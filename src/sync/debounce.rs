//! Trailing-edge debouncer
//!
//! Keeps at most one live timer in a `Scheduler`. Every trigger cancels the
//! pending timer and starts a fresh quiet period, so a burst of triggers
//! fires once, `delay` after the last one.

use super::scheduler::{Clock, Scheduler, TimerToken};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restart the quiet period with `task` as the payload.
    pub fn trigger<T, C: Clock>(&mut self, scheduler: &mut Scheduler<T, C>, task: T) -> TimerToken {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        let token = scheduler.schedule(self.delay, task);
        self.pending = Some(token);
        token
    }

    /// Drop the pending timer, if any.
    pub fn cancel<T, C: Clock>(&mut self, scheduler: &mut Scheduler<T, C>) -> bool {
        match self.pending.take() {
            Some(token) => scheduler.cancel(token),
            None => false,
        }
    }

    /// Acknowledge a fired timer. Returns `true` if it was this debouncer's
    /// live timer; stale tokens are ignored.
    pub fn fired(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::scheduler::ManualClock;

    #[test]
    fn test_burst_fires_once_after_last_trigger() {
        let clock = ManualClock::default();
        let mut scheduler = Scheduler::new(clock.clone());
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for i in 0..5 {
            debouncer.trigger(&mut scheduler, i);
            clock.advance_ms(100);
        }
        // Earlier timers were cancelled, only the last one is left
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(200)));

        // 100ms already elapsed since the last trigger
        clock.advance_ms(199);
        assert!(scheduler.due().is_empty());

        clock.advance_ms(1);
        let due = scheduler.due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, 4);
        assert!(debouncer.fired(due[0].0));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_clears_pending() {
        let clock = ManualClock::default();
        let mut scheduler = Scheduler::new(clock.clone());
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.trigger(&mut scheduler, ());
        assert!(debouncer.cancel(&mut scheduler));
        assert!(!debouncer.cancel(&mut scheduler));

        clock.advance_ms(1000);
        assert!(scheduler.due().is_empty());
    }

    #[test]
    fn test_stale_token_is_not_acknowledged() {
        let clock = ManualClock::default();
        let mut scheduler = Scheduler::new(clock);
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let first = debouncer.trigger(&mut scheduler, ());
        let second = debouncer.trigger(&mut scheduler, ());
        assert!(!debouncer.fired(first));
        assert!(debouncer.fired(second));
    }
}
