//! `dispatch-core` — foundational types for the `rust_dispatch` engine.
//!
//! This crate is a dependency of every other `dispatch-*` crate.  It has no
//! `dispatch-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`ids`]    | `CallId`, `EventId`, `UnitId`, `AgencyId`, `ZoneId`, …, `IdSequence` |
//! | [`geo`]    | `Position` (world metres), planar distance                   |
//! | [`time`]   | `Tick`, `SimClock`, `ClockSource`, `DispatchConfig`          |
//! | [`period`] | `TimePeriod`, `ShiftRotation`, `Weather`                     |
//! | [`kinds`]  | `ServiceSector`, `Priority`, `ResponseCode`, `CallCategory`, `UnitType`, `AgencyKind` |
//! | [`table`]  | `Ordinal` and the fixed-size enum-indexed tables             |
//! | [`rng`]    | `UnitRng` (per-unit), `SimRng` (global)                      |
//! | [`error`]  | `DispatchError`, `DispatchResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod kinds;
pub mod period;
pub mod rng;
pub mod table;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DispatchError, DispatchResult};
pub use geo::Position;
pub use ids::{AgencyId, CallId, EventId, IdSequence, LocationId, ScenarioId, UnitId, ZoneId};
pub use kinds::{AgencyKind, CallCategory, Priority, ResponseCode, ServiceSector, UnitType};
pub use period::{ShiftRotation, TimePeriod, Weather};
pub use rng::{SimRng, UnitRng};
pub use table::{CategoryTable, Ordinal, PeriodTable, PriorityTable, SectorTable, ShiftTable};
pub use time::{ClockSource, DispatchConfig, SimClock, Tick};
