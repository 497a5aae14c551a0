//! The `CallSignAllocator` contract shared by both pool strategies.

use std::collections::{HashMap, VecDeque};

use dispatch_core::{SimRng, UnitType};

use crate::{CallSign, CallSignResult, NumericBands, NumericPool, StructuredBeats, StructuredPool};

/// Which queue inside an allocator a request draws from.
///
/// Line units have one queue per unit type; supervisors of every type share
/// a single queue.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PoolKey {
    Line(UnitType),
    Supervisor,
}

impl PoolKey {
    #[inline]
    pub fn new(unit_type: UnitType, supervisor: bool) -> PoolKey {
        if supervisor { PoolKey::Supervisor } else { PoolKey::Line(unit_type) }
    }
}

/// Issues unique call signs for one jurisdiction.
///
/// # Contract
///
/// - `next` never returns the same sign twice for the same key.
/// - `None` means the key's pool is exhausted.  That is a capacity limit,
///   not an error: no more units of that kind can be created here.
/// - Inspection methods never consume.
pub trait CallSignAllocator: Send {
    /// Pop the next sign for `(unit_type, supervisor)`.
    fn next(&mut self, unit_type: UnitType, supervisor: bool) -> Option<CallSign>;

    /// Remaining numbers (or beats) for the key, in the order they will be
    /// issued.
    fn available_beats(&self, unit_type: UnitType, supervisor: bool) -> Vec<u16>;

    /// Number of signs still available for the key.
    fn remaining(&self, unit_type: UnitType, supervisor: bool) -> usize {
        self.available_beats(unit_type, supervisor).len()
    }
}

/// Declarative allocator choice, resolved when an agency is built.
#[derive(Clone, Debug)]
pub enum AllocatorSpec {
    Numeric(NumericBands),
    Structured(StructuredBeats),
}

impl AllocatorSpec {
    /// Validate the spec and build a shuffled allocator.
    pub fn build(&self, rng: &mut SimRng) -> CallSignResult<Box<dyn CallSignAllocator>> {
        Ok(match self {
            AllocatorSpec::Numeric(bands)    => Box::new(NumericPool::new(bands, rng)?),
            AllocatorSpec::Structured(beats) => Box::new(StructuredPool::new(beats, rng)?),
        })
    }
}

// ── Shared queue storage ──────────────────────────────────────────────────────

/// Shuffled consume-only queues keyed by [`PoolKey`].
#[derive(Debug, Default)]
pub(crate) struct PoolQueues {
    queues: HashMap<PoolKey, VecDeque<u16>>,
}

impl PoolQueues {
    /// Shuffle `numbers` and install them as the queue for `key`.
    pub(crate) fn insert(&mut self, key: PoolKey, mut numbers: Vec<u16>, rng: &mut SimRng) {
        rng.shuffle(&mut numbers);
        self.queues.insert(key, numbers.into());
    }

    pub(crate) fn pop(&mut self, key: PoolKey) -> Option<u16> {
        self.queues.get_mut(&key)?.pop_front()
    }

    pub(crate) fn peek_all(&self, key: PoolKey) -> Vec<u16> {
        self.queues
            .get(&key)
            .map(|q| q.iter().copied().collect())
            .unwrap_or_default()
    }
}
