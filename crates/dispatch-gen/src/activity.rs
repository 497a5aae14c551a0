//! Activity levels: how busy the region is during one time period.

use dispatch_core::{Ordinal, SimRng};

/// Call-volume multiplier, re-rolled at every period change.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityLevel {
    None,
    VeryLow,
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

dispatch_core::enum_table! {
    /// One value per [`ActivityLevel`].
    pub struct LevelTable[ActivityLevel; 6];
}

/// Relative roll weights: most periods are moderate.
pub const LEVEL_WEIGHTS: LevelTable<f64> = LevelTable([6.0, 12.0, 20.0, 30.0, 20.0, 12.0]);

/// `(low, high)` scale applied to a period's expected call count.
pub const LEVEL_MULTIPLIERS: LevelTable<(f64, f64)> = LevelTable([
    (0.00, 0.10),
    (0.20, 0.40),
    (0.50, 0.75),
    (0.75, 1.25),
    (1.25, 1.75),
    (1.75, 2.50),
]);

impl ActivityLevel {
    /// Draw a level with [`LEVEL_WEIGHTS`].
    pub fn roll(rng: &mut SimRng) -> ActivityLevel {
        rng.weighted_index(&LEVEL_WEIGHTS.0)
            .map(|i| Self::ALL[i])
            .unwrap_or_default()
    }

    #[inline]
    pub fn multiplier(self) -> (f64, f64) {
        LEVEL_MULTIPLIERS[self]
    }

    /// Sample a call count for a period whose base expectation is `base`.
    ///
    /// Uniform over `floor(base·low) ..= ceil(base·high)`.
    pub fn sample_count(self, base: f64, rng: &mut SimRng) -> u32 {
        let (lo, hi) = self.multiplier();
        let min = (base.max(0.0) * lo).floor() as u32;
        let max = (base.max(0.0) * hi).ceil() as u32;
        if max <= min { min } else { rng.gen_range(min..=max) }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::None     => "none",
            ActivityLevel::VeryLow  => "very low",
            ActivityLevel::Low      => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High     => "high",
            ActivityLevel::VeryHigh => "very high",
        }
    }
}

impl Ordinal for ActivityLevel {
    const ALL: &'static [Self] = &[
        ActivityLevel::None,
        ActivityLevel::VeryLow,
        ActivityLevel::Low,
        ActivityLevel::Moderate,
        ActivityLevel::High,
        ActivityLevel::VeryHigh,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
