//! Single-shot, cancellable timers on the input thread's own queue.
//!
//! Gesture classification needs delayed callbacks (the touchpad's idle and
//! click timeouts).  Instead of spawning a task per timer, every timer of a
//! surface lives in one [`TimerQueue`] keyed by deadline.  The driver asks
//! for [`TimerQueue::next_deadline`], sleeps until then, and drains the
//! expired entries back to their owning controls.
//!
//! # Handles as generation guards
//!
//! [`Scheduler::schedule`] returns a [`TimerHandle`] that the owning session
//! stores next to the state that scheduled it.  Handles are never reused, so
//! when a timer fires the session compares the fired handle with the one it
//! holds: a superseded timer can never be mistaken for the current one.
//! Sessions still re-check their own state before acting.
//!
//! # Time
//!
//! Time is an explicit millisecond count supplied by the caller (touch
//! events carry their own timestamp).  The queue never reads a clock, which
//! keeps every gesture test deterministic.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::domain::arbiter::ControlId;

/// Milliseconds since the surface's epoch.
pub type Millis = u64;

/// Opaque, never-reused identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer whose deadline has passed, ready to be delivered to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredTimer {
    pub handle: TimerHandle,
    pub owner: ControlId,
    pub deadline: Millis,
}

/// What a control sees of the timer queue while handling an event.
pub trait Scheduler {
    /// Current time on the queue's clock.
    fn now(&self) -> Millis;

    /// Schedules a single-shot timer for `owner`, firing `delay` from now.
    fn schedule(&mut self, owner: ControlId, delay: Duration) -> TimerHandle;

    /// Cancels a pending timer.  Returns `false` if it already fired or was
    /// cancelled before.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Deadline-ordered queue of pending timers for one input surface.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Millis,
    next_id: u64,
    by_deadline: BTreeMap<(Millis, TimerHandle), ControlId>,
    deadlines: HashMap<TimerHandle, Millis>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.  The clock never runs backwards; an older
    /// timestamp is ignored.
    pub fn advance_clock(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.by_deadline.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    ///
    /// The clock is moved to the timer's deadline, so timers scheduled from
    /// inside the callback are measured from when the callback was due, not
    /// from when the driver happened to wake up.
    pub fn pop_expired(&mut self, now: Millis) -> Option<ExpiredTimer> {
        let (&(deadline, handle), _) = self.by_deadline.iter().next()?;
        if deadline > now {
            return None;
        }
        let owner = self.by_deadline.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);
        self.advance_clock(deadline);
        Some(ExpiredTimer {
            handle,
            owner,
            deadline,
        })
    }

    /// Returns `true` if `handle` is scheduled and has not fired.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// Cancels every pending timer owned by `owner`.  Returns how many were removed.
    pub fn cancel_owned_by(&mut self, owner: ControlId) -> usize {
        let doomed: Vec<(Millis, TimerHandle)> = self
            .by_deadline
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.by_deadline.remove(key);
            self.deadlines.remove(&key.1);
        }
        doomed.len()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Millis {
        self.now
    }

    fn schedule(&mut self, owner: ControlId, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let deadline = self.now.saturating_add(delay_ms);
        self.by_deadline.insert((deadline, handle), owner);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => {
                self.by_deadline.remove(&(deadline, handle));
                true
            }
            None => false,
        }
    }
}
