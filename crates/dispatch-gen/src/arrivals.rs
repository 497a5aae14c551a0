//! `ArrivalQueue`: the pre-drawn incident times for the current period.
//!
//! Arrival times are drawn once per period and sorted, so each tick only
//! has to look at the front of the queue.

use std::collections::VecDeque;

use dispatch_core::{SimRng, Tick};

#[derive(Debug, Default)]
pub struct ArrivalQueue {
    inner: VecDeque<Tick>,
}

impl ArrivalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with `count` ticks drawn uniformly in
    /// `[start, end)`, ascending.  An empty window yields an empty queue.
    pub fn rebuild(&mut self, start: Tick, end: Tick, count: u32, rng: &mut SimRng) {
        self.inner.clear();
        if end <= start {
            return;
        }
        let mut ticks: Vec<Tick> = (0..count).map(|_| Tick(rng.gen_range(start.0..end.0))).collect();
        ticks.sort_unstable();
        self.inner.extend(ticks);
    }

    /// Pop the front arrival if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Tick) -> Option<Tick> {
        if *self.inner.front()? <= now {
            self.inner.pop_front()
        } else {
            None
        }
    }

    /// The next queued arrival.
    pub fn peek(&self) -> Option<Tick> {
        self.inner.front().copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tick> + '_ {
        self.inner.iter().copied()
    }
}
