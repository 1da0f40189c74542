#![forbid(unsafe_code)]

//! Host-driven time and one-shot timers.
//!
//! Nothing here reads a wall clock. The host advances [`DeterministicClock`]
//! (or passes `now` directly) and drains due entries from [`TimerQueue`].

use core::time::Duration;
use std::collections::{BTreeMap, HashMap};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// One-shot timers ordered by deadline, ties broken by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending timer. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.entries.remove(&(deadline, id))
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerId, T)> {
        let (&(deadline, id), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        let task = self.entries.remove(&(deadline, id))?;
        Some((deadline, id, task))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer, returning the tasks in deadline order.
    pub fn drain(&mut self) -> Vec<T> {
        self.deadlines.clear();
        std::mem::take(&mut self.entries).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(ms(10));
        c.advance(ms(5));
        assert_eq!(c.now(), ms(15));

        c.set(ms(3));
        assert_eq!(c.now(), ms(15));

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }

    #[test]
    fn pops_in_deadline_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(20), "b");
        q.schedule(ms(10), "a");
        q.schedule(ms(20), "c");

        assert_eq!(q.next_deadline(), Some(ms(10)));
        assert!(q.pop_due(ms(9)).is_none());

        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(20)))
            .map(|(_, _, t)| t)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_removes_only_pending() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(5), 1);
        let b = q.schedule(ms(6), 2);
        assert_eq!(q.cancel(a), Some(1));
        assert_eq!(q.cancel(a), None);
        assert!(!q.is_pending(a));
        assert!(q.is_pending(b));

        let (deadline, id, task) = q.pop_due(ms(100)).unwrap();
        assert_eq!((deadline, id, task), (ms(6), b, 2));
        assert_eq!(q.cancel(b), None);
    }

    #[test]
    fn drain_clears_everything() {
        let mut q = TimerQueue::new();
        let id = q.schedule(ms(2), 'y');
        q.schedule(ms(1), 'x');
        assert_eq!(q.drain(), vec!['x', 'y']);
        assert!(!q.is_pending(id));
        assert_eq!(q.next_deadline(), None);
    }
}
