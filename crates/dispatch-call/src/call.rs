//! `CallRecord`: the dispatch-facing unit of work, one per (event, sector).

use std::sync::Arc;

use dispatch_core::{
    AgencyId, CallCategory, CallId, EventId, Position, Priority, ResponseCode, ServiceSector, Tick,
    UnitId, ZoneId,
};
use rustc_hash::FxHashSet;

use crate::{Attachments, CloseFlag, DispatchDirective, EventRecord, ScenarioTemplate};

/// Call lifecycle.
///
/// ```text
/// Created → Assigned → Waiting → Dispatched → OnScene → Completed
///    ▲                    │
///    └──── declined ──────┘
/// ```
///
/// `Waiting` is only used while the human-controlled unit decides whether
/// to accept.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallStatus {
    Created,
    Assigned,
    Waiting,
    Dispatched,
    OnScene,
    Completed,
}

#[derive(Clone, Debug)]
pub struct CallRecord {
    pub id:             CallId,
    pub event:          EventId,
    pub sector:         ServiceSector,
    /// The agency whose dispatcher owns this call.
    pub agency:         AgencyId,
    pub scenario:       Arc<ScenarioTemplate>,
    pub zone:           ZoneId,
    pub position:       Position,
    pub created:        Tick,
    pub required_units: usize,
    pub priority:       Priority,
    pub response:       ResponseCode,
    status:             CallStatus,
    close:              Option<CloseFlag>,
    declined_by:        FxHashSet<UnitId>,
    responders:         Attachments,
}

impl CallRecord {
    /// The call for `sector` of `event`, with the sector's directive copied in.
    pub fn from_event(
        id:        CallId,
        event:     &EventRecord,
        sector:    ServiceSector,
        directive: &DispatchDirective,
        agency:    AgencyId,
        now:       Tick,
    ) -> Self {
        Self {
            id,
            event:          event.id,
            sector,
            agency,
            scenario:       Arc::clone(&event.scenario),
            zone:           event.location.zone,
            position:       event.location.position,
            created:        now,
            required_units: directive.required_units,
            priority:       directive.priority,
            response:       directive.response,
            status:         CallStatus::Created,
            close:          None,
            declined_by:    FxHashSet::default(),
            responders:     Attachments::default(),
        }
    }

    #[inline]
    pub fn status(&self) -> CallStatus {
        self.status
    }

    #[inline]
    pub fn category(&self) -> CallCategory {
        self.scenario.category
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.close.is_none()
    }

    #[inline]
    pub fn close_flag(&self) -> Option<CloseFlag> {
        self.close
    }

    /// Move to `status`.  Closed calls never change, and `Completed` is only
    /// reachable through [`end`][Self::end].
    pub fn set_status(&mut self, status: CallStatus) -> bool {
        if !self.is_open() || status == CallStatus::Completed {
            return false;
        }
        self.status = status;
        true
    }

    /// Ticks since creation.
    #[inline]
    pub fn age(&self, now: Tick) -> u64 {
        now.since(self.created)
    }

    /// Unattended for longer than the scenario's expiry window.
    pub fn is_expired(&self, now: Tick) -> bool {
        match self.scenario.expiry_ticks {
            Some(window) => self.is_open() && self.responders.is_empty() && self.age(now) > window,
            None => false,
        }
    }

    #[inline]
    pub fn distance_to(&self, position: Position) -> f32 {
        self.position.distance(position)
    }

    // ── Responders ────────────────────────────────────────────────────────

    /// Attach `unit`; a `Created` call becomes `Assigned`.
    pub fn attach(&mut self, unit: UnitId, force_primary: bool) -> bool {
        if !self.is_open() {
            return false;
        }
        let added = self.responders.attach(unit, force_primary);
        if self.status == CallStatus::Created {
            self.status = CallStatus::Assigned;
        }
        added
    }

    /// Detach `unit`; a call left with nobody reverts to `Created`.
    pub fn detach(&mut self, unit: UnitId) -> bool {
        let removed = self.responders.detach(unit);
        if removed && self.is_open() && self.responders.is_empty() {
            self.status = CallStatus::Created;
        }
        removed
    }

    /// `unit` turned the call down: remember it and put the call back up
    /// for grabs.  Responders still attached keep it `Assigned`.
    pub fn decline(&mut self, unit: UnitId) {
        self.declined_by.insert(unit);
        self.detach(unit);
        if self.is_open() {
            self.status = if self.responders.is_empty() { CallStatus::Created } else { CallStatus::Assigned };
        }
    }

    #[inline]
    pub fn was_declined_by(&self, unit: UnitId) -> bool {
        self.declined_by.contains(&unit)
    }

    #[inline]
    pub fn primary(&self) -> Option<UnitId> {
        self.responders.primary()
    }

    #[inline]
    pub fn attached(&self) -> &[UnitId] {
        self.responders.attached()
    }

    #[inline]
    pub fn is_attached(&self, unit: UnitId) -> bool {
        self.responders.contains(unit)
    }

    #[inline]
    pub fn needs_more_units(&self) -> bool {
        self.responders.len() < self.required_units
    }

    // ── Closing ───────────────────────────────────────────────────────────

    /// Close the call.  Returns the responders that were released on the
    /// first call, `None` if it was already closed.
    pub fn end(&mut self, flag: CloseFlag) -> Option<Vec<UnitId>> {
        if self.close.is_some() {
            return None;
        }
        self.close = Some(flag);
        self.status = CallStatus::Completed;
        self.declined_by.clear();
        Some(self.responders.clear())
    }
}
