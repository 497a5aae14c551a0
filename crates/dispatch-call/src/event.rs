//! `EventRecord`: one generated incident, before it is split per sector.

use std::sync::Arc;

use dispatch_core::{EventId, Priority, Tick, UnitId};

use crate::{Attachments, Location, ScenarioTemplate};

/// Event lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventStatus {
    Created,
    Reported,
    Completed,
}

/// Why a record was closed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloseFlag {
    /// Responders finished the job.
    Completed,
    /// Nobody took the call in time.
    Expired,
    /// A responder was pulled off for a more urgent call.
    Premature,
    /// Closed by the engine to repair inconsistent state.
    Forced,
}

impl CloseFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseFlag::Completed => "completed",
            CloseFlag::Expired   => "expired",
            CloseFlag::Premature => "premature",
            CloseFlag::Forced    => "forced",
        }
    }
}

impl std::fmt::Display for CloseFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A generated incident.
#[derive(Clone, Debug)]
pub struct EventRecord {
    pub id:                 EventId,
    pub scenario:           Arc<ScenarioTemplate>,
    pub created:            Tick,
    pub priority:           Priority,
    pub original_priority:  Priority,
    pub location:           Location,
    pub emergency:          bool,
    pub declined_by_player: bool,
    pub required_units:     usize,
    status:                 EventStatus,
    close:                  Option<CloseFlag>,
    responders:             Attachments,
    description:            Option<String>,
}

impl EventRecord {
    /// Build an event from a template.  Priority is the most urgent among the
    /// template's directives (routine if it has none).
    pub fn new(id: EventId, scenario: Arc<ScenarioTemplate>, location: Location, now: Tick) -> Self {
        let priority = scenario.top_priority().unwrap_or(Priority::Routine);
        Self {
            id,
            created:            now,
            priority,
            original_priority:  priority,
            location,
            emergency:          scenario.emergency,
            declined_by_player: false,
            required_units:     scenario.total_required_units(),
            status:             EventStatus::Created,
            close:              None,
            responders:         Attachments::default(),
            description:        Some(scenario.description.clone()),
            scenario,
        }
    }

    #[inline]
    pub fn status(&self) -> EventStatus {
        self.status
    }

    /// Created → Reported.  Returns `false` from any other state.
    pub fn mark_reported(&mut self) -> bool {
        if self.status != EventStatus::Created {
            return false;
        }
        self.status = EventStatus::Reported;
        true
    }

    #[inline]
    pub fn has_ended(&self) -> bool {
        self.close.is_some()
    }

    #[inline]
    pub fn close_flag(&self) -> Option<CloseFlag> {
        self.close
    }

    /// Free text read with the call; released when the event closes.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    // ── Responders ────────────────────────────────────────────────────────

    /// No-op once the event has ended.
    pub fn attach(&mut self, unit: UnitId, force_primary: bool) -> bool {
        !self.has_ended() && self.responders.attach(unit, force_primary)
    }

    pub fn detach(&mut self, unit: UnitId) -> bool {
        self.responders.detach(unit)
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
    pub fn needs_more_units(&self) -> bool {
        self.responders.len() < self.required_units
    }

    // ── Closing ───────────────────────────────────────────────────────────

    /// Close the event.  Only the first call has any effect and returns
    /// `true`; the caller then cascades the closure to the event's calls.
    pub fn end(&mut self, flag: CloseFlag) -> bool {
        if self.close.is_some() {
            return false;
        }
        self.close = Some(flag);
        self.status = EventStatus::Completed;
        self.responders.clear();
        self.description = None;
        true
    }
}
