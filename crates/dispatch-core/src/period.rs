//! Time-of-day periods, duty shift rotations, and weather.
//!
//! Both periods and shifts are fixed partitions of the 24-hour day:
//!
//! ```text
//! hour       0      6      12     14     18     22     24
//! period     |Night |Morning|  Day  |     |Evening     |
//! shift      |Night |  Day        |  Swing      |Night |
//! ```

use crate::table::Ordinal;

// ── TimePeriod ────────────────────────────────────────────────────────────────

/// A six-hour slice of the day with its own crime profile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimePeriod {
    Morning,
    Day,
    Evening,
    Night,
}

impl TimePeriod {
    /// Length of every period.
    pub const HOURS: u32 = 6;

    /// The period containing `hour` (0–23; larger values wrap).
    pub fn from_hour(hour: u32) -> TimePeriod {
        match hour % 24 {
            6..=11  => TimePeriod::Morning,
            12..=17 => TimePeriod::Day,
            18..=23 => TimePeriod::Evening,
            _       => TimePeriod::Night,
        }
    }

    /// First hour of the period.
    pub fn start_hour(self) -> u32 {
        match self {
            TimePeriod::Morning => 6,
            TimePeriod::Day     => 12,
            TimePeriod::Evening => 18,
            TimePeriod::Night   => 0,
        }
    }

    /// Hour at which the period ends (exclusive; `24` for Evening).
    pub fn end_hour(self) -> u32 {
        self.start_hour() + Self::HOURS
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Day     => "day",
            TimePeriod::Evening => "evening",
            TimePeriod::Night   => "night",
        }
    }
}

impl Ordinal for TimePeriod {
    const ALL: &'static [Self] = &[
        TimePeriod::Morning,
        TimePeriod::Day,
        TimePeriod::Evening,
        TimePeriod::Night,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── ShiftRotation ─────────────────────────────────────────────────────────────

/// A duty period determining which responders are on duty.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftRotation {
    /// 06:00–14:00
    Day,
    /// 14:00–22:00
    Swing,
    /// 22:00–06:00
    Night,
}

impl ShiftRotation {
    /// The rotation on duty at `hour` (0–23; larger values wrap).
    pub fn at_hour(hour: u32) -> ShiftRotation {
        match hour % 24 {
            6..=13  => ShiftRotation::Day,
            14..=21 => ShiftRotation::Swing,
            _       => ShiftRotation::Night,
        }
    }

    pub fn start_hour(self) -> u32 {
        match self {
            ShiftRotation::Day   => 6,
            ShiftRotation::Swing => 14,
            ShiftRotation::Night => 22,
        }
    }

    /// The rotation that relieves this one.
    pub fn next(self) -> ShiftRotation {
        match self {
            ShiftRotation::Day   => ShiftRotation::Swing,
            ShiftRotation::Swing => ShiftRotation::Night,
            ShiftRotation::Night => ShiftRotation::Day,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftRotation::Day   => "day",
            ShiftRotation::Swing => "swing",
            ShiftRotation::Night => "night",
        }
    }
}

impl Ordinal for ShiftRotation {
    const ALL: &'static [Self] = &[
        ShiftRotation::Day,
        ShiftRotation::Swing,
        ShiftRotation::Night,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ShiftRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── Weather ───────────────────────────────────────────────────────────────────

/// Current weather as reported by the host.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weather {
    #[default]
    Clear,
    Overcast,
    Rain,
    Thunder,
    Fog,
    Snow,
}

impl Weather {
    /// Rain, thunder and snow.
    pub fn is_wet(self) -> bool {
        matches!(self, Weather::Rain | Weather::Thunder | Weather::Snow)
    }
}

impl Ordinal for Weather {
    const ALL: &'static [Self] = &[
        Weather::Clear,
        Weather::Overcast,
        Weather::Rain,
        Weather::Thunder,
        Weather::Fog,
        Weather::Snow,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}
