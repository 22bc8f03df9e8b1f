//! Timer scheduling port and a deterministic virtual clock.
//!
//! The state machines never read wall-clock time. Anything delayed (entrance
//! transition, copy feedback expiry, swipe cooldown, reveal stagger) is
//! requested through [`Scheduler::schedule`], which hands back a [`TimerId`].
//! When the host decides the timer has fired it passes the id back to the
//! owner's `on_timer`. Owners cancel every id they still hold on teardown.
//!
//! [`VirtualClock`] is the host used by tests and by `folio replay`: time only
//! moves when [`VirtualClock::advance`] is called.

use std::time::Duration;

/// Handle for a scheduled timer. Ids are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Schedule-and-cancel capability.
pub trait Scheduler {
    /// Request a callback after `delay`. A zero delay fires on the next advance.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    due: Duration,
    id: TimerId,
}

/// Manually advanced clock.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Move time forward by `by` and return the timers that fell due, ordered
    /// by due time and then by scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.id).collect()
    }

    /// Pop the earliest pending timer due at or before `limit` (absolute
    /// virtual time), moving the clock only as far as that timer.
    ///
    /// Hosts whose timer handlers schedule more timers use this, followed by
    /// [`VirtualClock::catch_up`], so follow-ups fire within the same window.
    pub fn advance_next(&mut self, limit: Duration) -> Option<TimerId> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= limit)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(idx, _)| idx)?;
        let fired = self.pending.remove(idx);
        if fired.due > self.now {
            self.now = fired.due;
        }
        Some(fired.id)
    }

    /// Move the clock to `limit` if it is behind it.
    pub fn catch_up(&mut self, limit: Duration) {
        if limit > self.now {
            self.now = limit;
        }
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            due: self.now + delay,
            id,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|p| p.id != id);
    }
}
