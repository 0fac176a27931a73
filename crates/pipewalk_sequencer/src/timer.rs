// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellable delay timers.
//!
//! Every scheduled continuation is represented by a handle that can be
//! cancelled before it fires. The queue has no thread and no wall clock;
//! the owner advances it explicitly with elapsed frame time.

use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub Uuid);

impl TimerId {
    /// Create a new random timer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

struct Entry<T> {
    id: TimerId,
    due: Duration,
    seq: u64,
    payload: T,
}

/// A queue of cancellable one-shot timers carrying payloads of type `T`.
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> TimerQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { now: Duration::ZERO, next_seq: 0, entries: Vec::new() }
    }

    /// Schedule `payload` to fire after `delay`
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { id, due: self.now + delay, seq, payload });
        id
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Total time the queue has been advanced by
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Advance the clock by `dt` and return the payloads that came due,
    /// ordered by due time (scheduling order breaks ties).
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;
        let now = self.now;

        let mut due = Vec::new();
        let mut rest = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.entries = rest;

        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.payload).collect()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), "a");
        assert!(queue.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(queue.advance(Duration::from_millis(50)), vec!["a"]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_fire_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(200), "late");
        queue.schedule(Duration::from_millis(100), "early");
        queue.schedule(Duration::from_millis(100), "early-too");
        assert_eq!(
            queue.advance(Duration::from_millis(300)),
            vec!["early", "early-too", "late"]
        );
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(Duration::from_millis(100), "cancelled");
        queue.schedule(Duration::from_millis(100), "kept");
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.advance(Duration::from_millis(200)), vec!["kept"]);
    }

    #[test]
    fn test_clear() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(10), 1);
        queue.schedule(Duration::from_millis(20), 2);
        queue.clear();
        assert_eq!(queue.pending(), 0);
        assert!(queue.advance(Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn test_delay_is_relative_to_advanced_clock() {
        let mut queue = TimerQueue::new();
        queue.advance(Duration::from_millis(500));
        queue.schedule(Duration::from_millis(100), "x");
        assert!(queue.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(queue.advance(Duration::from_millis(1)), vec!["x"]);
    }
}
