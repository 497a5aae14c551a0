//! Unit intents: what an AI unit asks the coordinator to do this tick.

use dispatch_core::{CallId, Tick};

use crate::OutOfServiceReason;

/// An action requested by [`UnitBehavior::update`][crate::UnitBehavior::update].
///
/// Intents are applied by the coordinator in ascending `UnitId` order after
/// every unit has been planned.  An intent that no longer matches the unit's
/// state when applied (e.g. the call closed in the meantime) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitIntent {
    /// Start driving to `call`; expect to arrive at `arrive_at`.
    Respond {
        call:      CallId,
        arrive_at: Tick,
    },

    /// Arrived; work the scene until `clear_at`.
    ArriveOnScene {
        call:     CallId,
        clear_at: Tick,
    },

    /// Primary is done: the call (and its event) is complete.
    ClearCall { call: CallId },

    /// A supporting unit is done and leaves; the call stays open.
    LeaveScene { call: CallId },

    GoOutOfService {
        reason: OutOfServiceReason,
        until:  Tick,
    },

    ReturnToService,
}
