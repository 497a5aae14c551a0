//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Ordering by id is also the
//! deterministic processing order used throughout the engine.

use std::fmt;
use std::marker::PhantomData;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// One dispatch-facing call (an incident × service sector pair).
    pub struct CallId(u32);
}

typed_id! {
    /// One incident in the world.  May own several calls.
    pub struct EventId(u32);
}

typed_id! {
    /// A responder unit.  Also the index into the roster's unit vector.
    pub struct UnitId(u32);
}

typed_id! {
    /// A jurisdictional agency (city police, county sheriff, …).
    pub struct AgencyId(u16);
}

typed_id! {
    /// A named geographic sub-region with its own crime profile.
    pub struct ZoneId(u16);
}

typed_id! {
    /// A scenario template in the catalog.
    pub struct ScenarioId(u32);
}

typed_id! {
    /// A location owned by the external location database.
    pub struct LocationId(u32);
}

// ── IdSequence ────────────────────────────────────────────────────────────────

/// Monotonic allocator for `u32`-backed ids.  Ids are never reused within a run.
#[derive(Debug, Clone)]
pub struct IdSequence<T> {
    next:    u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T: From<u32>> IdSequence<T> {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first, _marker: PhantomData }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> T {
        let id = T::from(self.next);
        self.next += 1;
        id
    }

    /// How many ids have been handed out since `starting_at(0)`.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

impl<T: From<u32>> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}
