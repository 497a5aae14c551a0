//! `dispatch-sim` — the dispatch coordinator and the simulation runner.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`agency`]      | `Agency`, `AssignmentPolicy`, `escalation_target`          |
//! | [`board`]       | `CallBoard`: open events and calls, priority buckets       |
//! | [`dispatcher`]  | `UnitDispatcher`, `DispatchAction`, `DispatchContext`      |
//! | [`bridge`]      | `ZoneDirectory`, `PresentationSink`, `HostCalloutBridge`, host signals |
//! | [`coordinator`] | `DispatchCoordinator`, `UnitSnapshot`                      |
//! | [`builder`]     | `CoordinatorBuilder`, `AgencySpec`, `UnitSpec`, `PlayerSpec` |
//! | [`observer`]    | `DispatchObserver`, `Lifecycle`, `NoopObserver`            |
//! | [`sim`]         | `Simulation`                                               |
//! | [`error`]       | `SimError`, `SimResult<T>`                                 |
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..total_ticks:
//!     generator.tick()          → activity level rolls, new incidents
//!     coordinator.report()      → one call per sector, queued per agency
//!     coordinator.tick()        → shifts, human hand-off, dispatchers, AI units
//!     locations.release()       → closed incidents free their location
//!     observer.on_*()           → lifecycle entries in recorded order
//!     clock.advance()
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | AI unit planning on Rayon; `num_threads` sizes the pool. |
//! | `serde`    | Forwards `serde` to every `dispatch-*` crate.           |

pub mod agency;
pub mod board;
pub mod bridge;
pub mod builder;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use agency::{escalation_target, Agency, AssignmentPolicy};
pub use board::CallBoard;
pub use bridge::{
    host_channel, HostCalloutBridge, HostSignal, HostSignalSender, Notification, NullHost,
    PresentationSink, StaticZoneDirectory, ZoneDirectory,
};
pub use builder::{AgencySpec, CoordinatorBuilder, PlayerSpec, UnitSpec};
pub use coordinator::{DispatchCoordinator, UnitSnapshot};
pub use dispatcher::{DispatchAction, DispatchContext, UnitDispatcher};
pub use error::{SimError, SimResult};
pub use observer::{DispatchObserver, Lifecycle, NoopObserver};
pub use sim::Simulation;
