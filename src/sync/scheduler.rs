//! Cancellable timers over a clock
//!
//! The UI is a frame loop, so timers are plain entries with a deadline. The
//! app drains due entries once per frame and asks egui to repaint when the
//! next one falls due. Tests drive a `ManualClock` instead of sleeping.

use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Clocks
// ─────────────────────────────────────────────────────────────────────────────

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Entry<T> {
    token: TimerToken,
    deadline: Duration,
    task: T,
}

/// Pending timers carrying a task of type `T`.
#[derive(Debug)]
pub struct Scheduler<T, C: Clock> {
    clock: C,
    next_token: u64,
    entries: Vec<Entry<T>>,
}

impl<T, C: Clock> Scheduler<T, C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_token: 0,
            entries: Vec::new(),
        }
    }

    /// Schedule `task` to fall due `after` from now.
    pub fn schedule(&mut self, after: Duration, task: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Entry {
            token,
            deadline: self.clock.now() + after,
            task,
        });
        token
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    /// Remove and return every timer whose deadline has passed,
    /// earliest first (ties in scheduling order).
    pub fn due(&mut self) -> Vec<(TimerToken, T)> {
        let now = self.clock.now();
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.deadline <= now);
        self.entries = pending;

        due.sort_by_key(|e| (e.deadline, e.token));
        due.into_iter().map(|e| (e.token, e.task)).collect()
    }

    /// Time until the earliest pending deadline, zero if one is overdue.
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .iter()
            .map(|e| e.deadline.saturating_sub(now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (Scheduler<&'static str, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (Scheduler::new(clock.clone()), clock)
    }

    #[test]
    fn test_timer_fires_at_deadline() {
        let (mut scheduler, clock) = scheduler();
        scheduler.schedule(Duration::from_millis(300), "refresh");

        clock.advance_ms(299);
        assert!(scheduler.due().is_empty());

        clock.advance_ms(1);
        let due = scheduler.due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, "refresh");
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_cancel() {
        let (mut scheduler, clock) = scheduler();
        let token = scheduler.schedule(Duration::from_millis(10), "x");
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));

        clock.advance_ms(20);
        assert!(scheduler.due().is_empty());
    }

    #[test]
    fn test_due_in_deadline_order() {
        let (mut scheduler, clock) = scheduler();
        scheduler.schedule(Duration::from_millis(30), "late");
        scheduler.schedule(Duration::from_millis(10), "early");
        scheduler.schedule(Duration::from_millis(10), "early-second");

        clock.advance_ms(50);
        let tasks: Vec<_> = scheduler.due().into_iter().map(|(_, t)| t).collect();
        assert_eq!(tasks, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_next_deadline() {
        let (mut scheduler, clock) = scheduler();
        assert_eq!(scheduler.next_deadline(), None);

        scheduler.schedule(Duration::from_millis(300), "a");
        clock.advance_ms(100);
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(200)));

        clock.advance_ms(500);
        assert_eq!(scheduler.next_deadline(), Some(Duration::ZERO));
    }
}
