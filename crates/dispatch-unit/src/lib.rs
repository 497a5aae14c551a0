//! `dispatch-unit` — responder units and how AI units behave.
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`unit`]     | `ResponderUnit`, `UnitStatus`, `Assignment`, `Controller`     |
//! | [`roster`]   | `Roster` (all units, indexed by `UnitId`), `UnitRngs`         |
//! | [`intent`]   | `UnitIntent`                                                  |
//! | [`behavior`] | `UnitBehavior`, `UnitContext`, `DefaultBehavior`, `plan_units` |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs [`plan_units`] on Rayon's thread pool.            |
//! | `serde`    | Adds `Serialize`/`Deserialize` to unit state.          |

pub mod behavior;
pub mod intent;
pub mod roster;
pub mod unit;


pub use behavior::{plan_units, DefaultBehavior, IdleBehavior, UnitBehavior, UnitContext};
pub use intent::UnitIntent;
pub use roster::{Roster, UnitRngs};
pub use unit::{Assignment, Controller, OutOfServiceReason, ResponderUnit, UnitStatus, UnitTimers};
