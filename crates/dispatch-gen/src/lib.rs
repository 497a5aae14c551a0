//! `dispatch-gen` — incident generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`activity`]  | `ActivityLevel`, `LevelTable`, roll weights, multipliers  |
//! | [`arrivals`]  | `ArrivalQueue` (sorted per-period arrival ticks)          |
//! | [`zone`]      | `ZoneProfile`                                             |
//! | [`provider`]  | `LocationProvider` trait, `StaticLocations`               |
//! | [`generator`] | `EventGenerator`, `GenEvent`, `SkipReason`                |
//! | [`loader`]    | `load_zones_csv`, `load_zones_reader`                     |
//! | [`config`]    | `GeneratorConfig`                                         |
//! | [`error`]     | `GenError`, `GenResult<T>`                                |
//!
//! # Volume model (summary)
//!
//! ```text
//! base[period]  = Σ zones calls_per_hour[period] × 6
//! N             ~ U{ floor(base·lo) ..= ceil(base·hi) }   (lo, hi) from level
//! arrivals      = N ticks ~ U[now, period_end), sorted
//! ```

pub mod activity;
pub mod arrivals;
pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod provider;
pub mod zone;


pub use activity::{ActivityLevel, LevelTable, LEVEL_MULTIPLIERS, LEVEL_WEIGHTS};
pub use arrivals::ArrivalQueue;
pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use generator::{EventGenerator, GenEvent, SkipReason};
pub use loader::{load_zones_csv, load_zones_reader};
pub use provider::{LocationProvider, StaticLocations};
pub use zone::ZoneProfile;
