use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

/*
Virtual-Time Scheduler
======================

Every timed thing in the piano (the auto-player's next note, a tone reaching
the end of its window, an animation frame) is a timer in one queue. The queue
runs on virtual time: it only moves when the owner calls `pop_due` or
`advance_to`, so the same sequence of calls always produces the same firing
times. The live app feeds it wall-clock time; tests feed it whatever they like.

Ordering
--------

Timers are keyed by (deadline, sequence number). Two timers with the same
deadline fire in the order they were scheduled.

Firing
------

`pop_due(until)` removes the earliest timer due at or before `until` AND moves
`now` to that timer's deadline before handing it out. A callback that
schedules a follow-up therefore schedules it relative to when it was supposed
to fire, not to when the owner happened to poll. No drift accumulates across
a song.

Cancellation
------------

`cancel` removes the entry outright. A cancelled timer can never be returned
by `pop_due`; there is nothing to check for at fire time.
*/

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub struct Scheduler<E> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), E>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` from now.
    pub fn schedule_in(&mut self, delay: Duration, event: E) -> TimerId {
        let deadline = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = TimerId(seq);
        self.queue.insert((deadline, seq), event);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Remove a pending timer. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Take the earliest timer due at or before `until`, moving `now` to its
    /// deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let (&(deadline, seq), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }

        let event = self.queue.remove(&(deadline, seq))?;
        let id = TimerId(seq);
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((id, event))
    }

    /// Move `now` forward to `until` without firing anything. Call after
    /// draining `pop_due`. Time never moves backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(deadline, _)| deadline)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
