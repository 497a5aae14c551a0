//! Seams to the host world: zones, presentation, and the human callout
//! bridge.
//!
//! Host signals travel the other way over a `crossbeam-channel`.  The host
//! keeps a cloneable [`HostSignalSender`] and may send from any thread; the
//! coordinator drains the receiving end at fixed points in its tick.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use dispatch_core::{AgencyId, CallId, Position, ScenarioId, ShiftRotation, UnitId, ZoneId};

use crate::Agency;

// ── ZoneDirectory ─────────────────────────────────────────────────────────────

/// Geographic lookups supplied by the host.
pub trait ZoneDirectory {
    /// The zone containing `position`, if any.
    fn zone_of(&self, position: Position) -> Option<ZoneId>;

    /// Agencies responsible for `zone`, most local first.
    fn jurisdiction_agencies(&self, zone: ZoneId) -> Vec<AgencyId>;
}

/// A directory built from agency jurisdictions and zone centre points.
///
/// `zone_of` returns the zone with the nearest centre.  Agencies that list a
/// zone come first (in id order), statewide agencies after them.
#[derive(Clone, Debug, Default)]
pub struct StaticZoneDirectory {
    centres: Vec<(ZoneId, Position)>,
    local:   Vec<(AgencyId, Vec<ZoneId>)>,
    wide:    Vec<AgencyId>,
}

impl StaticZoneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_agencies(agencies: &[Agency]) -> Self {
        let mut dir = Self::new();
        for agency in agencies {
            dir.add_agency(agency.id, agency.jurisdiction.clone(), agency.kind.is_statewide());
        }
        dir
    }

    pub fn add_agency(&mut self, agency: AgencyId, zones: Vec<ZoneId>, statewide: bool) {
        if statewide {
            self.wide.push(agency);
        }
        self.local.push((agency, zones));
    }

    pub fn with_centre(mut self, zone: ZoneId, centre: Position) -> Self {
        self.centres.push((zone, centre));
        self
    }
}

impl ZoneDirectory for StaticZoneDirectory {
    fn zone_of(&self, position: Position) -> Option<ZoneId> {
        self.centres
            .iter()
            .min_by(|a, b| a.1.distance_sq(position).total_cmp(&b.1.distance_sq(position)))
            .map(|(zone, _)| *zone)
    }

    fn jurisdiction_agencies(&self, zone: ZoneId) -> Vec<AgencyId> {
        let mut out: Vec<AgencyId> = self
            .local
            .iter()
            .filter(|(_, zones)| zones.contains(&zone))
            .map(|(id, _)| *id)
            .collect();
        for id in &self.wide {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }
}

// ── PresentationSink ──────────────────────────────────────────────────────────

/// Something the host should show or play.
#[derive(Clone, PartialEq, Debug)]
pub enum Notification {
    /// A dispatch read out over the radio.
    Radio {
        unit: UnitId,
        call: CallId,
        text: String,
    },
    ShiftStarted(ShiftRotation),
    ShiftEnded(ShiftRotation),
    /// Operator-facing status text.
    Operator(String),
}

/// Fire-and-forget presentation output.
pub trait PresentationSink {
    fn notify(&mut self, notification: Notification);
}

// ── HostCalloutBridge ─────────────────────────────────────────────────────────

/// Commands from the coordinator to the host's callout runtime.
pub trait HostCalloutBridge {
    /// Show `call` to the player and wait for accept or decline.
    fn offer_callout(&mut self, call: CallId, scenario: ScenarioId);

    /// Start the scripted callout for `call`.
    fn start_callout(&mut self, call: CallId, scenario: ScenarioId);

    /// Abort the callout for `call`.
    fn stop_callout(&mut self, call: CallId);

    /// The callout the host is currently running, if any.
    fn running_callout(&self) -> Option<ScenarioId>;

    /// The host's own "available for calls" flag.
    fn player_available(&self) -> bool {
        true
    }

    fn set_player_available(&mut self, _available: bool) {}
}

/// A host with no presentation and no callout runtime.
#[derive(Debug, Default)]
pub struct NullHost;

impl PresentationSink for NullHost {
    fn notify(&mut self, _notification: Notification) {}
}

impl HostCalloutBridge for NullHost {
    fn offer_callout(&mut self, _call: CallId, _scenario: ScenarioId) {}
    fn start_callout(&mut self, _call: CallId, _scenario: ScenarioId) {}
    fn stop_callout(&mut self, _call: CallId) {}
    fn running_callout(&self) -> Option<ScenarioId> {
        None
    }
}

// ── Host signals ──────────────────────────────────────────────────────────────

/// Asynchronous answers from the host about the human unit's callout.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HostSignal {
    Accepted(CallId),
    Declined(CallId),
    /// The scripted callout for `call` is running on scene.
    Started { call: CallId, scenario: ScenarioId },
    Finished(CallId),
}

/// Cloneable, `Send` handle the host uses to reach the coordinator.
#[derive(Clone, Debug)]
pub struct HostSignalSender {
    tx: Sender<HostSignal>,
}

impl HostSignalSender {
    /// Queue `signal`.  `false` if the coordinator is gone.
    pub fn send(&self, signal: HostSignal) -> bool {
        match self.tx.try_send(signal) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) | Err(TrySendError::Full(_)) => false,
        }
    }
}

/// A fresh signal channel: the host half and the coordinator's inbox.
pub fn host_channel() -> (HostSignalSender, Receiver<HostSignal>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (HostSignalSender { tx }, rx)
}
