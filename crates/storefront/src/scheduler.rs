//! Deterministic timer queue.
//!
//! Deferred work (toast transitions, the overlay's focus move) is queued
//! against a virtual clock that the host advances explicitly. Tasks fire in
//! due-time order, ties broken by scheduling order. Timers cannot be
//! cancelled; a task that becomes irrelevant must be harmless when it fires.

use std::collections::BTreeMap;
use std::time::Duration;

use jardin_core::define_id;

define_id!(TimerId);

/// Timer queue over tasks of type `T`.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: TimerId,
    queue: BTreeMap<(Duration, TimerId), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: TimerId::new(1),
            queue: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id = id.next();
        self.queue.insert((self.now.saturating_add(delay), id), task);
        id
    }

    /// Pop the earliest task due at or before `until`.
    ///
    /// The clock moves to the task's due time. Returns `None`, with the
    /// clock moved to `until`, once nothing else is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let due = self
            .queue
            .first_key_value()
            .is_some_and(|((at, _), _)| *at <= until);

        if !due {
            self.now = self.now.max(until);
            return None;
        }

        let ((at, id), task) = self.queue.pop_first()?;
        self.now = self.now.max(at);
        Some((id, task))
    }
}
