//! Single timer queue for delayed board actions.
//!
//! Times are offsets on the session clock rather than wall-clock instants,
//! so the queue can be driven by any ticker and tested without sleeping.

use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone)]
struct Entry<A> {
    due: Duration,
    action: A,
}

/// Ordered queue of `(due, action)` pairs.
///
/// Entries come out ordered by due time; entries due at the same time keep
/// the order they were pushed in.
#[derive(Debug, Clone)]
pub struct Schedule<A> {
    entries: Vec<Entry<A>>,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A> Schedule<A> {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run at `due`.
    pub fn push_at(&mut self, due: Duration, action: A) {
        let idx = self.entries.partition_point(|entry| entry.due <= due);
        self.entries.insert(idx, Entry { due, action });
    }

    /// Queue `action` to run `delay` after `now`.
    pub fn push_after(&mut self, now: Duration, delay: Duration, action: A) {
        self.push_at(now.saturating_add(delay), action);
    }

    /// Remove and return every action due at or before `now`.
    pub fn drain_due(&mut self, now: Duration) -> Vec<A> {
        let split = self.entries.partition_point(|entry| entry.due <= now);
        self.entries.drain(..split).map(|entry| entry.action).collect()
    }

    /// Drop everything still pending; returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        if cancelled > 0 {
            debug!(cancelled, "Pending timers cancelled");
        }
        cancelled
    }

    /// Due time of the next pending action.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.first().map(|entry| entry.due)
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn drains_in_due_order() {
        let mut schedule = Schedule::new();
        schedule.push_at(ms(300), "c");
        schedule.push_at(ms(100), "a");
        schedule.push_at(ms(200), "b");

        assert_eq!(schedule.next_due(), Some(ms(100)));
        assert!(schedule.drain_due(ms(50)).is_empty());
        assert_eq!(schedule.drain_due(ms(200)), vec!["a", "b"]);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.drain_due(ms(1000)), vec!["c"]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn ties_keep_push_order() {
        let mut schedule = Schedule::new();
        schedule.push_at(ms(10), 1);
        schedule.push_at(ms(10), 2);
        schedule.push_after(ms(4), ms(6), 3);
        assert_eq!(schedule.drain_due(ms(10)), vec![1, 2, 3]);
    }

    #[test]
    fn cancel_all_empties_queue() {
        let mut schedule = Schedule::new();
        schedule.push_at(ms(1), ());
        schedule.push_at(ms(2), ());
        assert_eq!(schedule.cancel_all(), 2);
        assert!(schedule.drain_due(ms(10)).is_empty());
        assert_eq!(schedule.cancel_all(), 0);
    }
}
