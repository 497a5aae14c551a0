//! `DispatchCoordinator`: the single owner of calls, units, and the human
//! unit's callout handshake.

use std::collections::VecDeque;

use crossbeam_channel::Receiver;
use dispatch_call::{rank_for_unit, CallRecord, CallStatus, CloseFlag, DispatchDirective, EventRecord};
use dispatch_core::{
    AgencyId, CallId, DispatchConfig, DispatchError, DispatchResult, EventId, IdSequence, LocationId,
    Ordinal, Position, Priority, PriorityTable, ServiceSector, ShiftRotation, ShiftTable, SimClock,
    Tick, TimePeriod, UnitId, UnitType, Weather,
};
use dispatch_gen::ActivityLevel;
use dispatch_unit::{
    plan_units, Assignment, Roster, UnitBehavior, UnitContext, UnitIntent, UnitRngs, UnitStatus,
};
use tracing::{debug, error, info, warn};

use crate::{
    escalation_target, Agency, CallBoard, DispatchAction, DispatchContext, DispatchObserver,
    HostCalloutBridge, HostSignal, HostSignalSender, Lifecycle, Notification, PresentationSink,
    UnitDispatcher, ZoneDirectory,
};

// ── Player bookkeeping ────────────────────────────────────────────────────────

/// An offer the human unit has not answered yet.
#[derive(Copy, Clone, Debug)]
struct Waiting {
    call:  CallId,
    since: Tick,
}

#[derive(Debug, Default)]
pub(crate) struct PlayerState {
    unit:                 Option<UnitId>,
    /// Assigned by a dispatcher; the handshake runs at the next tick.
    handoff:              Option<CallId>,
    waiting:              Option<Waiting>,
    /// The call whose callout the host is running.
    active:               Option<CallId>,
    /// Host availability flag to restore when the offer or callout ends.
    previously_available: Option<bool>,
    ticks_since_callout:  u64,
    /// The host is running a callout the coordinator did not start.
    external_callout:     bool,
}

impl PlayerState {
    /// The human unit starts ready for its first callout.
    pub(crate) fn new(unit: Option<UnitId>, cooldown: u64) -> Self {
        Self { unit, ticks_since_callout: cooldown, ..Self::default() }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// A read-only view of one unit for status boards.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    pub unit:       UnitId,
    pub call_sign:  String,
    pub role:       UnitType,
    pub supervisor: bool,
    pub status:     UnitStatus,
    pub assignment: Assignment,
    pub on_duty:    bool,
    pub human:      bool,
    pub position:   Position,
}

// ── DispatchCoordinator ───────────────────────────────────────────────────────

/// Owns the call board, the roster, every agency's dispatcher, and the human
/// unit's handshake.
///
/// # Tick order
///
/// ```text
/// drain host signals
/// ① shift boundary       → units on/off duty, start/end notifications
/// ② human hand-off       → offer (needs acceptance) or start the callout
/// ③ every N ticks        → each dispatcher's process(), actions applied
/// ④ AI units             → plan_units (parallel with `parallel`), intents
///                          applied in ascending UnitId order
/// ⑤ ticks since the human unit's last callout += 1
/// drain host signals
/// ⑥ unanswered offer past the acceptance timeout → declined
/// ```
///
/// Closing a call always runs the same cascade: every dispatcher forgets it,
/// it leaves the board, its responders are released, then the lifecycle
/// entry is queued.  An event closes with its last call.
///
/// Create via [`CoordinatorBuilder`][crate::CoordinatorBuilder].
pub struct DispatchCoordinator {
    pub(crate) config:           DispatchConfig,
    pub(crate) agencies:         Vec<Agency>,
    pub(crate) dispatchers:      Vec<UnitDispatcher>,
    pub(crate) board:            CallBoard,
    pub(crate) roster:           Roster,
    pub(crate) rngs:             UnitRngs,
    pub(crate) behavior:         Box<dyn UnitBehavior>,
    pub(crate) zones:            Box<dyn ZoneDirectory>,
    pub(crate) host:             Box<dyn HostCalloutBridge>,
    pub(crate) sink:             Box<dyn PresentationSink>,
    pub(crate) inbox:            Receiver<HostSignal>,
    pub(crate) signals:          HostSignalSender,
    pub(crate) call_ids:         IdSequence<CallId>,
    pub(crate) player:           PlayerState,
    pub(crate) shift:            Option<ShiftRotation>,
    pub(crate) weather:          Weather,
    pub(crate) now:              Tick,
    /// Acceptance timeout converted to driving-loop ticks.
    pub(crate) acceptance_ticks: u64,
    pub(crate) lifecycle:        VecDeque<(Tick, Lifecycle)>,
    /// Locations of closed events, for the location provider.
    pub(crate) released:         Vec<LocationId>,
}

impl DispatchCoordinator {
    // ── Inspection ────────────────────────────────────────────────────────

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn board(&self) -> &CallBoard {
        &self.board
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.agencies
    }

    pub fn agency(&self, agency: AgencyId) -> Option<&Agency> {
        self.agencies.get(agency.index())
    }

    pub fn dispatcher(&self, agency: AgencyId) -> Option<&UnitDispatcher> {
        self.dispatchers.get(agency.index())
    }

    #[inline]
    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }

    /// A new handle for the host to send [`HostSignal`]s with.
    pub fn signal_sender(&self) -> HostSignalSender {
        self.signals.clone()
    }

    #[inline]
    pub fn player_unit(&self) -> Option<UnitId> {
        self.player.unit
    }

    /// The call offered to the human unit and not yet answered.
    pub fn waiting_call(&self) -> Option<CallId> {
        self.player.waiting.map(|w| w.call)
    }

    /// The call whose callout the host is running for the human unit.
    pub fn active_callout(&self) -> Option<CallId> {
        self.player.active
    }

    #[inline]
    pub fn external_callout_running(&self) -> bool {
        self.player.external_callout
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Open call ids per priority bucket.
    pub fn open_calls_by_priority(&self) -> PriorityTable<Vec<CallId>> {
        self.board.open_calls_by_priority()
    }

    /// Every unit of `agency`, in id order.
    pub fn roster_snapshot(&self, agency: AgencyId) -> Vec<UnitSnapshot> {
        self.roster
            .by_agency(agency)
            .map(|u| UnitSnapshot {
                unit:       u.id,
                call_sign:  u.call_sign.display_name(),
                role:       u.primary_role,
                supervisor: u.supervisor,
                status:     u.status(),
                assignment: u.assignment(),
                on_duty:    u.on_duty,
                human:      u.is_human(),
                position:   u.position,
            })
            .collect()
    }

    /// AI units of `agency` per shift rotation.
    pub fn staffing(&self, agency: AgencyId) -> ShiftTable<usize> {
        let mut table = ShiftTable([0; 3]);
        for unit in self.roster.by_agency(agency).filter(|u| !u.is_human()) {
            table[unit.shift] += 1;
        }
        table
    }

    // ── Lifecycle stream ──────────────────────────────────────────────────

    /// Deliver queued lifecycle entries to `observer`, oldest first.
    pub fn drain_lifecycle<O: DispatchObserver + ?Sized>(&mut self, observer: &mut O) {
        while let Some((tick, entry)) = self.lifecycle.pop_front() {
            entry.deliver(tick, observer);
        }
    }

    /// Locations whose events closed since the last call.
    pub fn take_released_locations(&mut self) -> Vec<LocationId> {
        std::mem::take(&mut self.released)
    }

    pub fn note_activity_level(&mut self, tick: Tick, period: TimePeriod, level: ActivityLevel) {
        self.lifecycle.push_back((tick, Lifecycle::ActivityLevelChanged { period, level }));
    }

    pub fn note_generation_disabled(&mut self) {
        self.sink.notify(Notification::Operator("incident generation stopped".into()));
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Put a generated incident on the board: one call per sector in its
    /// scenario, each owned by the first agency in the zone's jurisdiction
    /// list that serves that sector and category.
    ///
    /// `false` (logged) if the event is a duplicate, already ended, or no
    /// agency can take any of its sectors.  A rejected event's location is
    /// released.
    pub fn report(&mut self, mut event: EventRecord) -> bool {
        if self.board.contains_event(event.id) {
            warn!(event = %event.id, "event reported twice");
            return false;
        }
        if event.has_ended() {
            warn!(event = %event.id, "ended event reported");
            self.released.push(event.location.id);
            return false;
        }

        // Generated incidents arrive before the coordinator's own tick.
        let now = self.now.max(event.created);
        let zone = event.location.zone;
        let category = event.scenario.category;
        let local = self.zones.jurisdiction_agencies(zone);

        let sectors: Vec<(ServiceSector, DispatchDirective)> =
            event.scenario.sectors().map(|(s, d)| (s, *d)).collect();
        let mut calls = Vec::with_capacity(sectors.len());
        for (sector, directive) in sectors {
            let owner = local.iter().copied().find(|id| {
                self.agency(*id)
                    .is_some_and(|a| a.sector() == sector && a.serves(category))
            });
            let Some(owner) = owner else {
                warn!(event = %event.id, %sector, %zone, "no agency serves this sector here");
                continue;
            };
            calls.push(CallRecord::from_event(
                self.call_ids.next_id(),
                &event,
                sector,
                &directive,
                owner,
                now,
            ));
        }
        if calls.is_empty() {
            warn!(event = %event.id, error = %DispatchError::NoJurisdiction(zone), "event dropped");
            self.released.push(event.location.id);
            return false;
        }

        event.mark_reported();
        let event_id = event.id;
        info!(
            event = %event_id,
            scenario = %event.scenario.name,
            %zone,
            priority = %event.priority,
            calls = calls.len(),
            "incident reported"
        );
        self.board.insert_event(event);

        for call in calls {
            let (id, agency, priority) = (call.id, call.agency, call.priority);
            self.board.insert_call(call);
            let queued = match self.dispatchers.get_mut(agency.index()) {
                Some(d) if !d.is_disposed() => d.add_call(id, &self.board, now),
                _ => false,
            };
            if !queued {
                warn!(call = %id, agency = %agency, "no live dispatcher for call");
            }
            self.lifecycle.push_back((
                now,
                Lifecycle::CallAdded { call: id, event: event_id, agency, priority },
            ));
        }
        true
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the coordinator one tick.  `clock.current_tick` is "now".
    pub fn tick(&mut self, clock: &SimClock) {
        self.now = clock.current_tick;

        self.drain_inbox();
        self.sync_external_callout();

        // ① shift boundaries
        self.update_shift(clock.shift());

        // ② human hand-off
        self.run_handoff();

        // ③ dispatchers
        let interval = self.config.process_interval_ticks;
        if interval <= 1 || self.now.0 % interval == 0 {
            self.run_dispatchers();
        }

        // ④ AI units
        self.run_units();

        // ⑤ callout cooldown
        self.player.ticks_since_callout = self.player.ticks_since_callout.saturating_add(1);

        // ⑥ acceptance timeout
        self.drain_inbox();
        self.check_acceptance_timeout();
    }

    fn run_dispatchers(&mut self) {
        let ctx = DispatchContext {
            now:              self.now,
            board:            &self.board,
            roster:           &self.roster,
            player_ready:     self.player_ready(),
            mutual_aid_delay: self.config.mutual_aid_delay_ticks,
        };
        let mut actions: Vec<(AgencyId, DispatchAction)> = Vec::new();
        for dispatcher in self.dispatchers.iter_mut().filter(|d| !d.is_disposed()) {
            let agency = dispatcher.agency();
            actions.extend(dispatcher.process(&ctx).into_iter().map(|a| (agency, a)));
        }

        for (agency, action) in actions {
            match action {
                DispatchAction::Assign { unit, call } => {
                    if let Err(e) = self.assign_unit_to_call(unit, call) {
                        warn!(%unit, %call, error = %e, "assignment dropped");
                    }
                }
                DispatchAction::Raise { call, need } => self.route_mutual_aid(agency, call, need),
                DispatchAction::Expire(call) => {
                    self.close_call(call, CloseFlag::Expired);
                }
            }
        }
    }

    fn run_units(&mut self) {
        let ctx = UnitContext {
            tick:               self.now,
            tick_duration_secs: self.config.tick_duration_secs,
            weather:            self.weather,
            roster:             &self.roster,
            calls:              self.board.calls(),
        };
        let planned = plan_units(self.behavior.as_ref(), &ctx, &mut self.rngs);

        for (unit, intents) in planned {
            for intent in intents {
                self.apply_intent(unit, intent);
            }
        }
    }

    fn apply_intent(&mut self, unit: UnitId, intent: UnitIntent) {
        match intent {
            UnitIntent::Respond { call, arrive_at } => {
                let Some(u) = self.roster.get_mut(unit) else { return };
                if u.current_call() != Some(call) || u.status() != UnitStatus::Dispatched {
                    debug!(%unit, %call, "stale respond intent dropped");
                    return;
                }
                u.timers.arrive_at = Some(arrive_at);
                if let Some(c) = self.board.call_mut(call) {
                    if c.status() == CallStatus::Assigned {
                        c.set_status(CallStatus::Dispatched);
                    }
                }
            }
            UnitIntent::ArriveOnScene { call, clear_at } => {
                let Some(position) = self.board.call(call).map(|c| c.position) else { return };
                let Some(u) = self.roster.get_mut(unit) else { return };
                if u.current_call() != Some(call) || !u.arrive(position) {
                    return;
                }
                u.timers.clear_at = Some(clear_at);
                if let Some(c) = self.board.call_mut(call) {
                    c.set_status(CallStatus::OnScene);
                }
            }
            UnitIntent::ClearCall { call } => {
                let primary = self
                    .roster
                    .get(unit)
                    .is_some_and(|u| u.current_call() == Some(call) && u.is_primary_on_call());
                if primary {
                    self.close_call(call, CloseFlag::Completed);
                }
            }
            UnitIntent::LeaveScene { call } => {
                if self.roster.get(unit).is_some_and(|u| u.current_call() == Some(call)) {
                    self.detach_unit(unit, call);
                }
            }
            UnitIntent::GoOutOfService { reason, until } => {
                if let Some(call) = self.roster.get(unit).and_then(|u| u.current_call()) {
                    self.detach_unit(unit, call);
                }
                if let Some(u) = self.roster.get_mut(unit) {
                    u.go_out_of_service(reason, Some(until));
                    debug!(%unit, ?reason, %until, "out of service");
                }
            }
            UnitIntent::ReturnToService => {
                if let Some(u) = self.roster.get_mut(unit) {
                    if u.return_to_service() && u.relieved {
                        u.relieved = false;
                        u.on_duty = false;
                        debug!(%unit, call_sign = %u.call_sign, "relieved unit off duty; call sign stays retired");
                    }
                }
            }
        }
    }

    // ── Shifts ────────────────────────────────────────────────────────────

    fn update_shift(&mut self, shift: ShiftRotation) {
        if self.shift == Some(shift) {
            return;
        }
        if let Some(previous) = self.shift {
            self.end_shift(previous);
        }
        self.start_shift(shift);
        self.shift = Some(shift);
    }

    fn start_shift(&mut self, shift: ShiftRotation) {
        let mut started = 0usize;
        for unit in self.roster.iter_mut().filter(|u| !u.is_human() && u.shift == shift) {
            unit.on_duty = true;
            unit.relieved = false;
            if unit.status() == UnitStatus::Available {
                unit.position = unit.home;
            }
            started += 1;
        }
        info!(tick = %self.now, %shift, units = started, "shift started");
        self.sink.notify(Notification::ShiftStarted(shift));
        self.lifecycle.push_back((self.now, Lifecycle::ShiftStarted(shift)));
    }

    fn end_shift(&mut self, shift: ShiftRotation) {
        let (mut off, mut relieved) = (0usize, 0usize);
        for unit in self.roster.iter_mut().filter(|u| !u.is_human() && u.shift == shift && u.on_duty) {
            if unit.status() == UnitStatus::Available {
                unit.on_duty = false;
                off += 1;
                debug!(unit = %unit.id, call_sign = %unit.call_sign, "off duty; call sign stays retired");
            } else {
                unit.relieved = true;
                relieved += 1;
            }
        }
        info!(tick = %self.now, %shift, next = %shift.next(), off, relieved, "shift ended");
        self.sink.notify(Notification::ShiftEnded(shift));
        self.lifecycle.push_back((self.now, Lifecycle::ShiftEnded(shift)));
    }

    // ── Human unit ────────────────────────────────────────────────────────

    /// Put the human unit on duty.
    pub fn start_duty(&mut self) -> DispatchResult<()> {
        let id = self
            .player
            .unit
            .ok_or_else(|| DispatchError::Config("no human-controlled unit configured".into()))?;
        let unit = self.roster.get_mut(id).ok_or(DispatchError::UnknownUnit(id))?;
        unit.on_duty = true;
        let (agency, position) = (unit.agency, unit.position);
        info!(unit = %id, call_sign = %unit.call_sign, "human unit on duty");

        if let Some(zone) = self.zones.zone_of(position) {
            if !self.agency(agency).is_some_and(|a| a.covers(zone)) {
                warn!(unit = %id, %zone, "human unit starts outside its jurisdiction");
            }
        }
        Ok(())
    }

    /// Take the human unit off duty, abandoning any call it holds.
    pub fn end_duty(&mut self) -> DispatchResult<()> {
        let id = self
            .player
            .unit
            .ok_or_else(|| DispatchError::Config("no human-controlled unit configured".into()))?;
        if let Some(call) = self.roster.get(id).and_then(|u| u.current_call()) {
            self.detach_unit(id, call);
        }
        self.player.handoff = None;
        let unit = self.roster.get_mut(id).ok_or(DispatchError::UnknownUnit(id))?;
        unit.on_duty = false;
        info!(unit = %id, "human unit off duty");
        Ok(())
    }

    /// The human unit can be offered a new callout right now.
    pub fn player_ready(&self) -> bool {
        let Some(unit) = self.player.unit.and_then(|id| self.roster.get(id)) else {
            return false;
        };
        unit.is_available()
            && self.player.handoff.is_none()
            && self.player.waiting.is_none()
            && self.player.active.is_none()
            && !self.player.external_callout
            && self.player.ticks_since_callout >= self.config.player_callout_cooldown_ticks
            && self.host.player_available()
    }

    /// The best open call for the human unit, if any.
    ///
    /// Eligible calls are no less urgent than the unit's current one, in a
    /// category its agency serves, in its agency's jurisdiction, and still
    /// short of responders.  Ranked by priority, then calls the unit
    /// declined last, then distance.
    pub fn next_call_for_player(&self) -> Option<CallId> {
        let unit = self.roster.get(self.player.unit?)?;
        if !unit.on_duty {
            return None;
        }
        let agency = self.agency(unit.agency)?;
        let current = unit.current_call();
        let ceiling = current.and_then(|c| self.board.call(c)).map(|c| c.priority);

        let eligible = Priority::ALL
            .iter()
            .filter(|p| ceiling.is_none_or(|cur| !cur.outranks(**p)))
            .flat_map(|p| self.board.bucket(*p).iter())
            .filter_map(|id| self.board.call(*id))
            .filter(|c| c.is_open() && Some(c.id) != current && !c.is_attached(unit.id))
            .filter(|c| agency.serves(c.category()) && agency.covers(c.zone))
            .filter(|c| unit.can_serve(c.sector) && c.needs_more_units());

        rank_for_unit(eligible, unit.id, unit.position).first().map(|c| c.id)
    }

    /// Pull the next call for the human unit and start the hand-off.
    pub fn request_call_for_player(&mut self) -> DispatchResult<Option<CallId>> {
        if self.player.waiting.is_some() || self.player.active.is_some() || self.player.external_callout {
            return Ok(None);
        }
        let (Some(unit), Some(call)) = (self.player.unit, self.next_call_for_player()) else {
            return Ok(None);
        };
        self.assign_unit_to_call(unit, call)?;
        Ok(Some(call))
    }

    fn run_handoff(&mut self) {
        if self.player.external_callout {
            return;
        }
        let Some(call) = self.player.handoff.take() else { return };
        let Some(unit) = self.player.unit else { return };
        let Some(record) = self.board.call(call) else {
            warn!(%call, "hand-off for a call no longer on the board");
            return;
        };
        if !record.is_attached(unit) {
            debug!(%call, "hand-off for a call the human unit no longer holds");
            return;
        }
        let scenario = record.scenario.id;
        let needs_acceptance = record.scenario.requires_acceptance;

        self.player.previously_available = Some(self.host.player_available());
        if needs_acceptance {
            let text = self.radio_text(unit, call);
            self.sink.notify(Notification::Radio { unit, call, text });
            if let Some(c) = self.board.call_mut(call) {
                c.set_status(CallStatus::Waiting);
            }
            self.host.offer_callout(call, scenario);
            self.player.waiting = Some(Waiting { call, since: self.now });
            info!(%unit, %call, "callout offered");
        } else {
            self.start_player_callout(call);
        }
    }

    fn radio_text(&self, unit: UnitId, call: CallId) -> String {
        let sign = self.roster.get(unit).map(|u| u.call_sign.radio_name()).unwrap_or_default();
        let Some(record) = self.board.call(call) else { return sign };
        let code = if record.response.is_expedited() { 3 } else { 2 };
        let place = self
            .board
            .event(record.event)
            .map(|e| e.location.label.clone())
            .unwrap_or_default();
        format!("{sign}, respond code {code} to a {} at {place}", record.scenario.name)
    }

    fn start_player_callout(&mut self, call: CallId) {
        let Some(record) = self.board.call_mut(call) else { return };
        record.set_status(CallStatus::Dispatched);
        let scenario = record.scenario.id;
        self.host.set_player_available(false);
        self.host.start_callout(call, scenario);
        self.player.active = Some(call);
        self.player.ticks_since_callout = 0;
        info!(%call, %scenario, "callout started");
    }

    fn decline_player_call(&mut self, call: CallId) {
        let Some(unit) = self.player.unit else { return };
        self.player.waiting = None;

        if let Some(record) = self.board.call_mut(call) {
            record.decline(unit);
            let (event, primary) = (record.event, record.primary());
            if let Some(p) = primary.and_then(|p| self.roster.get_mut(p)) {
                p.set_primary(true);
            }
            if let Some(ev) = self.board.event_mut(event) {
                ev.declined_by_player = true;
                ev.detach(unit);
            }
        }
        if let Some(u) = self.roster.get_mut(unit) {
            if u.current_call() == Some(call) {
                u.release_to_available();
            }
        }
        if let Some(flag) = self.player.previously_available.take() {
            self.host.set_player_available(flag);
        }
        self.player.ticks_since_callout = 0;
        info!(%unit, %call, "callout declined");
    }

    fn check_acceptance_timeout(&mut self) {
        if self.player.external_callout {
            return;
        }
        let Some(waiting) = self.player.waiting else { return };
        if self.now.since(waiting.since) >= self.acceptance_ticks {
            info!(call = %waiting.call, "no answer to callout offer; declining");
            self.host.stop_callout(waiting.call);
            self.decline_player_call(waiting.call);
        }
    }

    // ── Host signals ──────────────────────────────────────────────────────

    fn drain_inbox(&mut self) {
        while let Ok(signal) = self.inbox.try_recv() {
            self.handle_signal(signal);
        }
    }

    fn handle_signal(&mut self, signal: HostSignal) {
        let waiting_for = |p: &PlayerState, call: CallId| p.waiting.is_some_and(|w| w.call == call);
        match signal {
            HostSignal::Accepted(call) => {
                if waiting_for(&self.player, call) {
                    self.player.waiting = None;
                    self.start_player_callout(call);
                } else {
                    warn!(%call, "accept for a call not awaiting an answer");
                }
            }
            HostSignal::Declined(call) => {
                if waiting_for(&self.player, call) {
                    self.decline_player_call(call);
                } else {
                    warn!(%call, "decline for a call not awaiting an answer");
                }
            }
            HostSignal::Started { call, scenario } => {
                if self.player.active != Some(call) {
                    warn!(%call, %scenario, "callout started outside the handshake; treating as external");
                    self.player.external_callout = true;
                    return;
                }
                let expected = self.board.call(call).map(|c| (c.scenario.id, c.position));
                match expected {
                    Some((id, position)) if id == scenario => {
                        if let Some(unit) = self.player.unit.and_then(|u| self.roster.get_mut(u)) {
                            unit.arrive(position);
                        }
                        if let Some(c) = self.board.call_mut(call) {
                            c.set_status(CallStatus::OnScene);
                        }
                        debug!(%call, "human unit on scene");
                    }
                    _ => {
                        error!(
                            %call,
                            expected = ?expected.map(|e| e.0),
                            got = %scenario,
                            "callout started with a different scenario; closing the stale call"
                        );
                        self.close_call(call, CloseFlag::Forced);
                    }
                }
            }
            HostSignal::Finished(call) => {
                if self.player.active == Some(call) {
                    self.close_call(call, CloseFlag::Completed);
                } else if self.player.external_callout {
                    self.player.external_callout = false;
                    info!("external callout finished");
                } else {
                    warn!(%call, "finish for a callout that is not running");
                }
            }
        }
    }

    fn sync_external_callout(&mut self) {
        let running = self.host.running_callout();
        let tracked = self
            .player
            .active
            .and_then(|c| self.board.call(c))
            .map(|c| c.scenario.id);
        match running {
            Some(scenario) if tracked != Some(scenario) => {
                if !self.player.external_callout {
                    warn!(%scenario, "external callout running; human unit bookkeeping suspended");
                    self.player.external_callout = true;
                }
            }
            None if self.player.external_callout => {
                self.player.external_callout = false;
                info!("external callout no longer running");
            }
            _ => {}
        }
    }

    // ── Assignment ────────────────────────────────────────────────────────

    /// Commit `unit` to `call`.
    ///
    /// A unit already on another call is moved: if it was the on-scene
    /// primary of a call with priority number above 2, that call is closed
    /// (`Premature` if the new call outranks it, `Forced` otherwise);
    /// otherwise it is just detached.  A moved unit becomes primary on the
    /// new call.  The human unit is always made primary and goes through the
    /// accept/decline hand-off.
    ///
    /// `Ok(false)` if the call is closed or the unit is already on it.
    pub fn assign_unit_to_call(&mut self, unit: UnitId, call: CallId) -> DispatchResult<bool> {
        let record = self.board.call(call).ok_or(DispatchError::UnknownCall(call))?;
        if !record.is_open() {
            return Ok(false);
        }
        let new_priority = record.priority;
        let u = self.roster.get(unit).ok_or(DispatchError::UnknownUnit(unit))?;
        let human = u.is_human();
        let previous = u.current_call();
        if previous == Some(call) {
            return Ok(false);
        }

        if let Some(prev) = previous {
            let was_primary = u.is_primary_on_call();
            let on_scene = u.status() == UnitStatus::OnScene;
            match self.board.call(prev).map(|c| c.priority) {
                Some(p) if was_primary && on_scene && p.number() > 2 => {
                    let flag = if new_priority.outranks(p) { CloseFlag::Premature } else { CloseFlag::Forced };
                    info!(%unit, from = %prev, to = %call, %flag, "primary pulled off scene");
                    self.close_call(prev, flag);
                }
                Some(_) => self.detach_unit(unit, prev),
                None => {
                    warn!(%unit, call = %prev, "unit held a call missing from the board");
                    if let Some(u) = self.roster.get_mut(unit) {
                        u.clear();
                    }
                }
            }
        }

        let Some(record) = self.board.call_mut(call) else {
            return Err(DispatchError::UnknownCall(call));
        };
        // The human unit and any unit pulled off another call lead the new one.
        let force_primary = human || previous.is_some();
        record.attach(unit, force_primary);
        let event = record.event;
        let primary = record.primary();
        let others: Vec<UnitId> = record.attached().iter().copied().filter(|&u| u != unit).collect();
        if let Some(ev) = self.board.event_mut(event) {
            ev.attach(unit, force_primary);
        }
        for other in others {
            if let Some(o) = self.roster.get_mut(other) {
                o.set_primary(primary == Some(other));
            }
        }
        if let Some(u) = self.roster.get_mut(unit) {
            u.assign(call, primary == Some(unit));
        }
        if human {
            self.player.handoff = Some(call);
        }
        info!(%unit, %call, primary = primary == Some(unit), "unit assigned");
        Ok(true)
    }

    /// Take `unit` off `call` without closing it.
    fn detach_unit(&mut self, unit: UnitId, call: CallId) {
        if let Some(record) = self.board.call_mut(call) {
            record.detach(unit);
            let (event, primary) = (record.event, record.primary());
            if let Some(ev) = self.board.event_mut(event) {
                ev.detach(unit);
            }
            if let Some(p) = primary.and_then(|p| self.roster.get_mut(p)) {
                p.set_primary(true);
            }
        }
        self.release_unit(unit, call, true);
    }

    /// `unit` no longer works `call`: clear it, send it home if its shift is
    /// over, and settle the human unit's bookkeeping.
    fn release_unit(&mut self, unit: UnitId, call: CallId, stop_host: bool) {
        let Some(u) = self.roster.get_mut(unit) else { return };
        if u.current_call() != Some(call) {
            return;
        }
        u.clear();
        if u.relieved {
            u.relieved = false;
            u.on_duty = false;
            debug!(%unit, call_sign = %u.call_sign, "relieved unit off duty; call sign stays retired");
        }
        if u.is_human() {
            self.release_player_call(call, stop_host);
        }
    }

    fn release_player_call(&mut self, call: CallId, stop_host: bool) {
        let player = &mut self.player;
        if player.handoff == Some(call) {
            player.handoff = None;
        }
        let offered = player.waiting.is_some_and(|w| w.call == call);
        let running = player.active == Some(call);
        if offered {
            player.waiting = None;
        }
        if running {
            player.active = None;
            player.ticks_since_callout = 0;
        }
        if stop_host && (offered || running) {
            self.host.stop_callout(call);
        }
        if let Some(flag) = player.previously_available.take() {
            self.host.set_player_available(flag);
        }
    }

    // ── Mutual aid ────────────────────────────────────────────────────────

    fn route_mutual_aid(&mut self, from: AgencyId, call: CallId, need: usize) {
        let Some(record) = self.board.call(call) else { return };
        let Some(to) = escalation_target(&self.agencies, from, record.zone, record.category()) else {
            debug!(%call, agency = %from, "no mutual-aid partner");
            return;
        };
        let queued = match self.dispatchers.get_mut(to.index()) {
            Some(d) if !d.is_disposed() => d.add_call(call, &self.board, self.now),
            _ => false,
        };
        if queued {
            info!(%call, from = %from, to = %to, need, "mutual aid requested");
            self.lifecycle.push_back((self.now, Lifecycle::CallRaised { call, from, to }));
        }
    }

    // ── Closing ───────────────────────────────────────────────────────────

    /// Close `call` with `flag` and run the closure cascade.  `false` if it
    /// was not open on the board.
    pub fn close_call(&mut self, call: CallId, flag: CloseFlag) -> bool {
        let Some(record) = self.board.call_mut(call) else { return false };
        let Some(released) = record.end(flag) else { return false };
        let event = record.event;

        for dispatcher in self.dispatchers.iter_mut().filter(|d| !d.is_disposed()) {
            dispatcher.remove_call(call);
        }
        self.board.remove_call(call);
        for unit in released {
            if let Some(ev) = self.board.event_mut(event) {
                ev.detach(unit);
            }
            self.release_unit(unit, call, flag != CloseFlag::Completed);
        }
        let entry = match flag {
            CloseFlag::Expired => Lifecycle::CallExpired(call),
            _ => Lifecycle::CallCompleted { call, flag },
        };
        self.lifecycle.push_back((self.now, entry));
        info!(%call, %flag, "call closed");

        if self.board.calls_of(event).is_empty() {
            self.finish_event(event, flag);
        }
        true
    }

    /// Close every open call of `event`.
    pub fn close_event(&mut self, event: EventId, flag: CloseFlag) -> bool {
        if !self.board.contains_event(event) {
            return false;
        }
        let calls = self.board.calls_of(event);
        if calls.is_empty() {
            self.finish_event(event, flag);
        }
        for call in calls {
            self.close_call(call, flag);
        }
        true
    }

    fn finish_event(&mut self, event: EventId, flag: CloseFlag) {
        if let Some(mut record) = self.board.remove_event(event) {
            record.end(flag);
            self.released.push(record.location.id);
            debug!(%event, %flag, "incident over");
        }
    }

    /// Dispose every dispatcher and stop the human unit's callout.
    pub fn shutdown(&mut self) {
        if let Some(call) = self.player.active.take().or(self.player.waiting.take().map(|w| w.call)) {
            self.host.stop_callout(call);
        }
        for dispatcher in &mut self.dispatchers {
            if !dispatcher.is_disposed() {
                dispatcher.dispose();
            }
        }
        info!(open_calls = self.board.call_count(), "dispatch shut down");
    }
}
