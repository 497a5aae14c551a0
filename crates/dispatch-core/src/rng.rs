//! Deterministic per-unit and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each responder unit gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (unit_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive unit IDs uniformly across the seed space.  Units
//! never share RNG state, so the AI update phase produces the same result
//! whether it runs sequentially or on Rayon.
//!
//! Everything else (call generation, call-sign shuffles, activity levels)
//! draws from a single `SimRng` owned by the runner, or from children derived
//! from it with [`SimRng::child`].

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::UnitId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UnitRng ───────────────────────────────────────────────────────────────────

/// Per-unit deterministic RNG.
pub struct UnitRng(SmallRng);

impl UnitRng {
    /// Seed deterministically from the run's global seed and a unit ID.
    pub fn new(global_seed: u64, unit: UnitId) -> Self {
        let seed = global_seed ^ (unit.0 as u64).wrapping_mul(MIXING_CONSTANT);
        UnitRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations.
///
/// Used only from the single-threaded tick loop.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.  Each subsystem
    /// (generator, call-sign pools, locations) gets its own stream.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Pick an index into `weights` with probability proportional to its
    /// weight.
    ///
    /// Zero-weight entries are never picked.  Returns `None` if `weights` is
    /// empty, all zero, or contains a negative/non-finite weight.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.0))
    }

    /// Pick one element of `items` weighted by `weight`.  See
    /// [`weighted_index`][Self::weighted_index].
    pub fn choose_weighted<'a, T>(
        &mut self,
        items:  &'a [T],
        weight: impl Fn(&T) -> f64,
    ) -> Option<&'a T> {
        let weights: Vec<f64> = items.iter().map(weight).collect();
        self.weighted_index(&weights).map(|i| &items[i])
    }
}
