//! Single-threaded timer queue
//!
//! Time is an integer millisecond counter owned by the scheduler. Callbacks
//! are plain values handed back to the caller in deadline order; nothing runs
//! on its own.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use super::state::TargetId;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Clock,
    Spawn,
    Reload,
    Expire(TargetId),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    event: TimerEvent,
    /// Some for repeating timers
    interval: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    deadline: u64,
    seq: u64,
    id: TimerId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of one-shot and repeating timers
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    queue: BinaryHeap<Reverse<Entry>>,
    live: HashMap<TimerId, Timer>,
    next_id: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time (ms since the scheduler was created)
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire `event` once, `delay` ms from now
    pub fn schedule_once(&mut self, delay: u64, event: TimerEvent) -> TimerId {
        self.insert(delay, event, None)
    }

    /// Fire `event` every `interval` ms, starting one interval from now
    pub fn schedule_repeating(&mut self, interval: u64, event: TimerEvent) -> TimerId {
        debug_assert!(interval > 0, "repeating timer needs a non-zero interval");
        self.insert(interval, event, Some(interval))
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed before being returned.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerEvent)> {
        loop {
            let Reverse(entry) = *self.queue.peek()?;
            if entry.deadline > until {
                return None;
            }
            self.queue.pop();

            // Cancelled entries are dropped here
            let Some(timer) = self.live.get(&entry.id).copied() else {
                continue;
            };

            self.now = self.now.max(entry.deadline);
            match timer.interval {
                Some(interval) => self.push(entry.id, entry.deadline + interval),
                None => {
                    self.live.remove(&entry.id);
                }
            }
            return Some((entry.id, timer.event));
        }
    }

    /// Move the clock forward to `to` without firing anything
    pub fn advance_to(&mut self, to: u64) {
        self.now = self.now.max(to);
    }

    fn insert(&mut self, delay: u64, event: TimerEvent, interval: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Timer { event, interval });
        self.push(id, self.now + delay);
        id
    }

    fn push(&mut self, id: TimerId, deadline: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { deadline, seq, id }));
    }
}
