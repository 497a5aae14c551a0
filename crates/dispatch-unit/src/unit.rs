//! `ResponderUnit` and its status/assignment state.

use dispatch_callsign::CallSign;
use dispatch_core::{AgencyId, CallId, Position, ServiceSector, ShiftRotation, Tick, UnitId, UnitType};

/// Where a unit is in its response cycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitStatus {
    Available,
    Dispatched,
    OnScene,
    OutOfService,
}

impl UnitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Available    => "available",
            UnitStatus::Dispatched   => "dispatched",
            UnitStatus::OnScene      => "on scene",
            UnitStatus::OutOfService => "out of service",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Why a unit is out of service.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutOfServiceReason {
    Meal,
    Reports,
    Vehicle,
}

/// What the unit is committed to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Assignment {
    #[default]
    None,
    Call {
        call:    CallId,
        primary: bool,
    },
    OutOfService(OutOfServiceReason),
}

/// Who drives the unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    Ai,
    Human,
}

/// Pending deadlines for an AI unit.  All `None` while idle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTimers {
    /// Expected arrival on scene.
    pub arrive_at:  Option<Tick>,
    /// When the unit finishes on scene.
    pub clear_at:   Option<Tick>,
    /// When an out-of-service unit is back.
    pub in_service: Option<Tick>,
}

/// A dispatchable agent.
///
/// Invariant: `Assignment::Call` implies status `Dispatched` or `OnScene`;
/// `Assignment::OutOfService` implies status `OutOfService`.  Only the
/// transition methods below change status and assignment together.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponderUnit {
    pub id:             UnitId,
    pub agency:         AgencyId,
    pub call_sign:      CallSign,
    pub primary_role:   UnitType,
    pub secondary_role: Option<UnitType>,
    pub supervisor:     bool,
    pub shift:          ShiftRotation,
    pub controller:     Controller,
    pub position:       Position,
    /// Station the unit returns to between calls.
    pub home:           Position,
    pub on_duty:        bool,
    /// The unit's shift ended while it was busy; it goes off duty once clear.
    pub relieved:       bool,
    pub timers:         UnitTimers,
    status:             UnitStatus,
    assignment:         Assignment,
}

impl ResponderUnit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:           UnitId,
        agency:       AgencyId,
        call_sign:    CallSign,
        primary_role: UnitType,
        supervisor:   bool,
        shift:        ShiftRotation,
        controller:   Controller,
        home:         Position,
    ) -> Self {
        Self {
            id,
            agency,
            call_sign,
            primary_role,
            secondary_role: None,
            supervisor,
            shift,
            controller,
            position:       home,
            home,
            on_duty:        false,
            relieved:       false,
            timers:         UnitTimers::default(),
            status:         UnitStatus::Available,
            assignment:     Assignment::None,
        }
    }

    pub fn with_secondary_role(mut self, role: UnitType) -> Self {
        self.secondary_role = Some(role);
        self
    }

    #[inline]
    pub fn status(&self) -> UnitStatus {
        self.status
    }

    #[inline]
    pub fn assignment(&self) -> Assignment {
        self.assignment
    }

    #[inline]
    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }

    /// On duty and free to take a call.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.on_duty && self.status == UnitStatus::Available
    }

    pub fn can_serve(&self, sector: ServiceSector) -> bool {
        self.primary_role.sector() == sector
            || self.secondary_role.is_some_and(|r| r.sector() == sector)
    }

    pub fn current_call(&self) -> Option<CallId> {
        match self.assignment {
            Assignment::Call { call, .. } => Some(call),
            _ => None,
        }
    }

    pub fn is_primary_on_call(&self) -> bool {
        matches!(self.assignment, Assignment::Call { primary: true, .. })
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Commit to `call`.  Any previous assignment is replaced; the caller is
    /// responsible for detaching from the old call first.
    pub fn assign(&mut self, call: CallId, primary: bool) {
        self.assignment = Assignment::Call { call, primary };
        self.status = UnitStatus::Dispatched;
        self.timers = UnitTimers::default();
    }

    /// Update the primary flag after a promotion on the current call.
    pub fn set_primary(&mut self, primary: bool) {
        if let Assignment::Call { call, .. } = self.assignment {
            self.assignment = Assignment::Call { call, primary };
        }
    }

    /// Dispatched → OnScene.  Returns `false` from any other state.
    pub fn arrive(&mut self, position: Position) -> bool {
        if self.status != UnitStatus::Dispatched {
            return false;
        }
        self.status = UnitStatus::OnScene;
        self.position = position;
        self.timers.arrive_at = None;
        true
    }

    /// Drop the current call and become available.  Returns the call left.
    pub fn clear(&mut self) -> Option<CallId> {
        let call = self.current_call()?;
        self.assignment = Assignment::None;
        self.status = UnitStatus::Available;
        self.timers = UnitTimers::default();
        Some(call)
    }

    /// Reachable from any state.  Returns the call abandoned, if any.
    pub fn go_out_of_service(&mut self, reason: OutOfServiceReason, until: Option<Tick>) -> Option<CallId> {
        let left = self.current_call();
        self.assignment = Assignment::OutOfService(reason);
        self.status = UnitStatus::OutOfService;
        self.timers = UnitTimers { in_service: until, ..UnitTimers::default() };
        left
    }

    /// OutOfService → Available.
    pub fn return_to_service(&mut self) -> bool {
        if self.status != UnitStatus::OutOfService {
            return false;
        }
        self.assignment = Assignment::None;
        self.status = UnitStatus::Available;
        self.timers = UnitTimers::default();
        true
    }

    /// Restore a Waiting-handshake availability without touching timers.
    pub fn release_to_available(&mut self) {
        self.assignment = Assignment::None;
        self.status = UnitStatus::Available;
    }
}
