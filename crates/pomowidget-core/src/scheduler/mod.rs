//! Cooperative callback scheduler.
//!
//! A single-threaded stand-in for a host event loop's repeating and one-shot
//! timers. The scheduler never runs anything on its own: the caller advances
//! the clock with [`Scheduler::pop_due`] and dispatches each returned [`Task`].
//!
//! ## Ordering
//!
//! Pending callbacks fire in due-time order. Callbacks due at the same instant
//! fire in the order they were (re-)armed. Repeating timers are re-armed at
//! `due + period` before being handed out, so a callback may cancel its own
//! timer.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to a pending callback. Cancelling a stale handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What to run when a timer comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Session countdown tick.
    SessionTick,
    /// Quiet period ended without activity.
    IdleQuietElapsed,
    /// Next slideshow frame.
    SlideshowCycle,
    /// Remove the alarm flash from the timer display.
    AlarmFlashEnd,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    task: Task,
    period_ms: Option<u64>,
}

/// Queue key: due time, then arm sequence.
type Slot = (u64, u64);

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<Slot, Entry>,
    slots: HashMap<TimerId, Slot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the scheduler was created.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm a repeating callback. The first run happens one `period` from now.
    ///
    /// Periods below one millisecond are raised to one millisecond.
    pub fn set_interval(&mut self, period: Duration, task: Task) -> TimerId {
        let period_ms = duration_ms(period).max(1);
        self.arm(period_ms, task, Some(period_ms))
    }

    /// Arm a one-shot callback `delay` from now.
    ///
    /// Delays below one millisecond are raised to one millisecond, so a
    /// callback that re-arms itself cannot pin the clock.
    pub fn set_timeout(&mut self, delay: Duration, task: Task) -> TimerId {
        self.arm(duration_ms(delay).max(1), task, None)
    }

    /// Cancel a pending callback. Returns whether anything was pending.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => self.queue.remove(&slot).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending callback.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Take the earliest callback due at or before `until_ms`.
    ///
    /// Moves the clock to that callback's due time. When nothing is due, the
    /// clock moves to `until_ms` and `None` is returned.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Task)> {
        let slot = match self.queue.keys().next() {
            Some(&slot) if slot.0 <= until_ms => slot,
            _ => {
                self.now_ms = self.now_ms.max(until_ms);
                return None;
            }
        };

        let entry = self.queue.remove(&slot)?;
        self.slots.remove(&entry.id);
        self.now_ms = self.now_ms.max(slot.0);

        if let Some(period_ms) = entry.period_ms {
            let next = (slot.0.saturating_add(period_ms), self.bump_seq());
            self.slots.insert(entry.id, next);
            self.queue.insert(next, entry.clone());
        }

        Some((entry.id, entry.task))
    }

    fn arm(&mut self, delay_ms: u64, task: Task, period_ms: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let slot = (self.now_ms.saturating_add(delay_ms), self.bump_seq());
        self.slots.insert(id, slot);
        self.queue.insert(
            slot,
            Entry {
                id,
                task,
                period_ms,
            },
        );
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
