//! Host Timers
//!
//! Deferred callbacks on a virtual clock. The host advances the clock; due
//! tasks come out one at a time ordered by due time, then scheduling order,
//! so the caller can finish processing one task before starting the next.

use std::fmt;
use std::time::Duration;

/// Timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A due callback, taken out of the queue
pub struct Task<C> {
    pub id: TimerId,
    pub due: Duration,
    callback: Box<dyn FnOnce(&mut C)>,
}

impl<C> Task<C> {
    /// Run the callback against its context
    pub fn run(self, ctx: &mut C) {
        (self.callback)(ctx)
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("id", &self.id).field("due", &self.due).finish()
    }
}

/// Timer queue with a virtual clock
pub struct TimerQueue<C> {
    now: Duration,
    next_id: u64,
    pending: Vec<Task<C>>,
}

impl<C> TimerQueue<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `callback` to run `delay` from now
    pub fn set_timeout(&mut self, delay: Duration, callback: impl FnOnce(&mut C) + 'static) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Task {
            id,
            due: self.now + delay,
            callback: Box::new(callback),
        });
        id
    }

    /// Number of scheduled callbacks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest callback
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.due).min()
    }

    /// Remove the earliest task due at or before `until`, moving the clock to its due time
    pub fn pop_due(&mut self, until: Duration) -> Option<Task<C>> {
        let (idx, _) = self.pending.iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))?;
        let task = self.pending.remove(idx);
        self.now = self.now.max(task.due);
        Some(task)
    }

    /// Move the clock forward without running anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<C> Default for TimerQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TimerQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}
