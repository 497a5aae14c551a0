//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  The mapping to the
//! simulated wall clock is held in `SimClock`:
//!
//!   sim_time = start_unix_secs + tick * tick_duration_secs
//!
//! The default tick is 60 s (one simulated minute), which is also the
//! scheduler resolution of the event generator.  Each tick is driven once per
//! `real_tick_interval` of real time, so
//!
//!   time_scale = tick_duration_secs / real_tick_interval
//!
//! Time-of-day (periods, shift rotations) is derived from the simulated
//! wall clock in UTC without a datetime library.

use std::fmt;
use std::time::Duration;

use crate::{ShiftRotation, TimePeriod};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── ClockSource ───────────────────────────────────────────────────────────────

/// Where the engine reads "now" from.
///
/// [`SimClock`] is the engine's own implementation; a host that drives time
/// itself implements this over its game clock.
pub trait ClockSource {
    /// The current simulation tick.
    fn now(&self) -> Tick;

    /// Simulated seconds that pass per real second.
    fn time_scale(&self) -> f64;
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts, simulated wall-clock seconds, and time of day.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// How many simulated seconds one tick represents.  Default: 60.
    pub tick_duration_secs: u32,
    /// Real time between two ticks of the driving loop.
    pub real_tick_interval: Duration,
    /// The current tick.  Advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock starting at `start_unix_secs` with the given resolution.
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32, real_tick_interval: Duration) -> Self {
        Self {
            start_unix_secs,
            tick_duration_secs,
            real_tick_interval,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> i64 {
        self.current_tick.0 as i64 * self.tick_duration_secs as i64
    }

    /// Simulated Unix timestamp corresponding to `current_tick`.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.start_unix_secs + self.elapsed_secs()
    }

    /// Seconds since (UTC) midnight of the simulated day.
    #[inline]
    pub fn seconds_of_day(&self) -> u32 {
        self.current_unix_secs().rem_euclid(86_400) as u32
    }

    #[inline]
    pub fn hour_of_day(&self) -> u32 {
        self.seconds_of_day() / 3_600
    }

    /// The time period the clock is currently in.
    pub fn time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.hour_of_day())
    }

    /// The shift rotation currently on duty.
    pub fn shift(&self) -> ShiftRotation {
        ShiftRotation::at_hour(self.hour_of_day())
    }

    /// First tick at or after the end of the current time period.
    pub fn period_end_tick(&self) -> Tick {
        let end_secs = self.time_period().end_hour() * 3_600;
        let remaining = end_secs.saturating_sub(self.seconds_of_day()) as u64;
        self.current_tick + self.ticks_for_secs(remaining)
    }

    /// Break elapsed time into (day, hour, minute) of the simulated clock.
    pub fn day_hm(&self) -> (u64, u32, u32) {
        let days = (self.elapsed_secs().max(0) as u64 + self.seconds_of_day_at_start() as u64) / 86_400;
        let sod = self.seconds_of_day();
        (days, sod / 3_600, (sod % 3_600) / 60)
    }

    fn seconds_of_day_at_start(&self) -> u32 {
        self.start_unix_secs.rem_euclid(86_400) as u32
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.div_ceil(self.tick_duration_secs as u64)
    }

    #[inline]
    pub fn ticks_for_minutes(&self, minutes: u64) -> u64 {
        self.ticks_for_secs(minutes * 60)
    }

    #[inline]
    pub fn ticks_for_hours(&self, hours: u64) -> u64 {
        self.ticks_for_secs(hours * 3_600)
    }

    /// How many ticks of the driving loop span `real` time? (rounds up, ≥ 1)
    pub fn ticks_for_real(&self, real: Duration) -> u64 {
        let interval = self.real_tick_interval.as_millis().max(1);
        (real.as_millis().div_ceil(interval) as u64).max(1)
    }
}

impl ClockSource for SimClock {
    #[inline]
    fn now(&self) -> Tick {
        self.current_tick
    }

    fn time_scale(&self) -> f64 {
        let real = self.real_tick_interval.as_secs_f64();
        if real <= 0.0 {
            return f64::INFINITY;
        }
        self.tick_duration_secs as f64 / real
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.day_hm();
        write!(f, "{} (day {} {:02}:{:02})", self.current_tick, d, h, m)
    }
}

// ── DispatchConfig ────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the coordinator builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchConfig {
    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,

    /// Simulated seconds per tick.  Default: 60.
    pub tick_duration_secs: u32,

    /// Total ticks to simulate.  One day at 1 tick/minute: 1,440.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Real time between ticks of the driving loop.
    pub real_tick_interval: Duration,

    /// How long the human-controlled unit may leave a call in `Waiting`
    /// before it is declined on their behalf (real time).
    pub acceptance_timeout: Duration,

    /// Run every dispatcher's `process` once per this many ticks.
    pub process_interval_ticks: u64,

    /// Minimum ticks between two callouts offered to the human unit.
    pub player_callout_cooldown_ticks: u64,

    /// How long a call may sit unserviced before its dispatcher asks for
    /// mutual aid.
    pub mutual_aid_delay_ticks: u64,

    /// Worker threads for the parallel unit update.  `None` uses all cores.
    pub num_threads: Option<usize>,
}

impl DispatchConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs, self.real_tick_interval)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:               0,
            tick_duration_secs:            60,
            total_ticks:                   1_440,
            seed:                          0,
            real_tick_interval:            Duration::from_secs(1),
            acceptance_timeout:            Duration::from_secs(20),
            process_interval_ticks:        2,
            player_callout_cooldown_ticks: 5,
            mutual_aid_delay_ticks:        3,
            num_threads:                   None,
        }
    }
}
