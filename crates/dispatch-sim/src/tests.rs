//! Integration tests for dispatch-sim.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dispatch_call::{CloseFlag, DispatchDirective, EventRecord, Location, LocationKind, ScenarioTemplate};
use dispatch_callsign::{AllocatorSpec, NumericBands};
use dispatch_core::{
    AgencyId, AgencyKind, CallCategory, CallId, DispatchConfig, EventId, LocationId, Position,
    Priority, ResponseCode, ScenarioId, ServiceSector, ShiftRotation, SimClock, Tick, UnitType, ZoneId,
};
use dispatch_unit::{IdleBehavior, UnitStatus};

use crate::{
    AgencySpec, CoordinatorBuilder, DispatchCoordinator, HostCalloutBridge, HostSignal, Lifecycle,
    Notification, PlayerSpec, PresentationSink, UnitSpec,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 08:00 start, so every test begins inside the day shift.
fn config() -> DispatchConfig {
    DispatchConfig {
        start_unix_secs:        8 * 3_600,
        total_ticks:            120,
        seed:                   7,
        process_interval_ticks: 1,
        num_threads:            Some(1),
        ..DispatchConfig::default()
    }
}

fn police_signs() -> AllocatorSpec {
    AllocatorSpec::Numeric(NumericBands::police())
}

fn city(units: usize) -> AgencySpec {
    AgencySpec::new("City PD", AgencyKind::CityPolice, police_signs())
        .zones([ZoneId(0)])
        .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, units, Position::flat(0.0, 0.0)))
}

fn county(units: usize) -> AgencySpec {
    AgencySpec::new("County SO", AgencyKind::CountySheriff, police_signs())
        .zones([ZoneId(0), ZoneId(1)])
        .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, units, Position::flat(2_000.0, 0.0)))
}

fn player() -> PlayerSpec {
    PlayerSpec {
        agency:    AgencyId(0),
        unit_type: UnitType::Patrol,
        position:  Position::flat(0.0, 0.0),
    }
}

fn burglary(id: u32, priority: Priority) -> Arc<ScenarioTemplate> {
    Arc::new(
        ScenarioTemplate::new(ScenarioId(id), "Burglary", CallCategory::Property, LocationKind::Residence)
            .with_directive(ServiceSector::Police, DispatchDirective::new(1, priority, ResponseCode::Code2)),
    )
}

fn offered_burglary(id: u32, priority: Priority) -> Arc<ScenarioTemplate> {
    let mut template = (*burglary(id, priority)).clone();
    template.requires_acceptance = true;
    Arc::new(template)
}

fn event(id: u32, scenario: Arc<ScenarioTemplate>, x: f32, zone: u16) -> EventRecord {
    let location = Location::new(
        LocationId(id),
        ZoneId(zone),
        Position::flat(x, 0.0),
        LocationKind::Residence,
        "12 Elm St",
    );
    EventRecord::new(EventId(id), scenario, location, Tick(0))
}

fn only_call(c: &DispatchCoordinator, event: u32) -> CallId {
    let calls = c.board().calls_of(EventId(event));
    assert_eq!(calls.len(), 1, "event {event} should have exactly one call");
    calls[0]
}

fn step(c: &mut DispatchCoordinator, clock: &mut SimClock, n: u64) {
    for _ in 0..n {
        c.tick(clock);
        clock.advance();
    }
}

fn lifecycle(c: &mut DispatchCoordinator) -> Vec<Lifecycle> {
    c.lifecycle.drain(..).map(|(_, entry)| entry).collect()
}

/// What the coordinator asked of the host.
#[derive(Debug)]
struct HostLog {
    offered:   Vec<CallId>,
    started:   Vec<CallId>,
    stopped:   Vec<CallId>,
    running:   Option<ScenarioId>,
    available: bool,
    notes:     Vec<Notification>,
}

#[derive(Clone)]
struct RecordingHost(Rc<RefCell<HostLog>>);

impl RecordingHost {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(HostLog {
            offered:   Vec::new(),
            started:   Vec::new(),
            stopped:   Vec::new(),
            running:   None,
            available: true,
            notes:     Vec::new(),
        })))
    }
}

impl HostCalloutBridge for RecordingHost {
    fn offer_callout(&mut self, call: CallId, _scenario: ScenarioId) {
        self.0.borrow_mut().offered.push(call);
    }
    fn start_callout(&mut self, call: CallId, _scenario: ScenarioId) {
        self.0.borrow_mut().started.push(call);
    }
    fn stop_callout(&mut self, call: CallId) {
        self.0.borrow_mut().stopped.push(call);
    }
    fn running_callout(&self) -> Option<ScenarioId> {
        self.0.borrow().running
    }
    fn player_available(&self) -> bool {
        self.0.borrow().available
    }
    fn set_player_available(&mut self, available: bool) {
        self.0.borrow_mut().available = available;
    }
}

impl PresentationSink for RecordingHost {
    fn notify(&mut self, notification: Notification) {
        self.0.borrow_mut().notes.push(notification);
    }
}

/// City PD with only the human unit, on duty, wired to a recording host.
fn player_only() -> (DispatchCoordinator, RecordingHost, SimClock) {
    let host = RecordingHost::new();
    let mut c = CoordinatorBuilder::new(config())
        .agency(city(0))
        .player(player())
        .behavior(IdleBehavior)
        .host(host.clone())
        .sink(host.clone())
        .build()
        .unwrap();
    c.start_duty().unwrap();
    let clock = c.config().make_clock();
    (c, host, clock)
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_units_and_dispatchers() {
        let c = CoordinatorBuilder::new(config())
            .agency(city(3))
            .agency(county(2))
            .player(player())
            .build()
            .unwrap();
        assert_eq!(c.roster().len(), 6);
        assert_eq!(c.agencies().len(), 2);
        assert!(c.dispatcher(AgencyId(1)).is_some());
        let human = c.player_unit().unwrap();
        assert_eq!(c.roster().get(human).unwrap().agency, AgencyId(0));
        assert!(!c.roster().get(human).unwrap().on_duty);
    }

    #[test]
    fn no_agencies_is_an_error() {
        let result = CoordinatorBuilder::new(config()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_tick_duration_is_an_error() {
        let cfg = DispatchConfig { tick_duration_secs: 0, ..config() };
        let result = CoordinatorBuilder::new(cfg).agency(city(1)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn local_agency_needs_zones() {
        let spec = AgencySpec::new("Nowhere PD", AgencyKind::CityPolice, police_signs());
        let result = CoordinatorBuilder::new(config()).agency(spec).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn statewide_agency_needs_no_zones() {
        let spec = AgencySpec::new("State Patrol", AgencyKind::StatePatrol, police_signs());
        assert!(CoordinatorBuilder::new(config()).agency(spec).build().is_ok());
    }

    #[test]
    fn player_agency_must_exist() {
        let spec = PlayerSpec { agency: AgencyId(4), ..player() };
        let result = CoordinatorBuilder::new(config()).agency(city(0)).player(spec).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn exhausted_pool_skips_units() {
        let bands = NumericBands { line: vec![(UnitType::Patrol, 100..=101)], supervisor: 10..=10 };
        let spec = AgencySpec::new("Tiny PD", AgencyKind::CityPolice, AllocatorSpec::Numeric(bands))
            .zones([ZoneId(0)])
            .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, 3, Position::flat(0.0, 0.0)));
        let c = CoordinatorBuilder::new(config()).agency(spec).build().unwrap();
        assert_eq!(c.roster().len(), 2);
        assert_eq!(c.agency(AgencyId(0)).unwrap().call_signs_left(UnitType::Patrol, false), 0);
    }

    #[test]
    fn human_unit_needs_a_call_sign() {
        let bands = NumericBands { line: vec![(UnitType::Patrol, 100..=101)], supervisor: 10..=10 };
        let spec = AgencySpec::new("Tiny PD", AgencyKind::CityPolice, AllocatorSpec::Numeric(bands))
            .zones([ZoneId(0)])
            .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, 2, Position::flat(0.0, 0.0)));
        let result = CoordinatorBuilder::new(config()).agency(spec).player(player()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn acceptance_timeout_in_driving_ticks() {
        // 20 s of real time at one tick per real second.
        let c = CoordinatorBuilder::new(config()).agency(city(0)).build().unwrap();
        assert_eq!(c.acceptance_ticks, 20);
    }

    #[test]
    fn staffing_and_snapshot() {
        let spec = city(2).units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Night, 1, Position::flat(0.0, 0.0)));
        let c = CoordinatorBuilder::new(config()).agency(spec).player(player()).build().unwrap();
        let staffing = c.staffing(AgencyId(0));
        assert_eq!(staffing[ShiftRotation::Day], 2);
        assert_eq!(staffing[ShiftRotation::Night], 1);
        assert_eq!(staffing[ShiftRotation::Swing], 0);

        let snapshot = c.roster_snapshot(AgencyId(0));
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.iter().filter(|s| s.human).count(), 1);
        assert!(snapshot.iter().all(|s| s.status == UnitStatus::Available));
    }
}

// ── Agencies and zones ────────────────────────────────────────────────────────

#[cfg(test)]
mod routing_tests {
    use super::*;
    use crate::{escalation_target, StaticZoneDirectory, ZoneDirectory};

    #[test]
    fn city_escalates_to_county() {
        let c = CoordinatorBuilder::new(config()).agency(city(0)).agency(county(0)).build().unwrap();
        let target = escalation_target(c.agencies(), AgencyId(0), ZoneId(0), CallCategory::Property);
        assert_eq!(target, Some(AgencyId(1)));
    }

    #[test]
    fn escalation_needs_coverage() {
        let c = CoordinatorBuilder::new(config()).agency(city(0)).agency(county(0)).build().unwrap();
        assert_eq!(escalation_target(c.agencies(), AgencyId(0), ZoneId(5), CallCategory::Property), None);
    }

    #[test]
    fn escalation_respects_categories() {
        let sheriff = county(0).categories([CallCategory::Traffic]);
        let c = CoordinatorBuilder::new(config()).agency(city(0)).agency(sheriff).build().unwrap();
        assert_eq!(escalation_target(c.agencies(), AgencyId(0), ZoneId(0), CallCategory::Property), None);
        assert_eq!(
            escalation_target(c.agencies(), AgencyId(0), ZoneId(0), CallCategory::Traffic),
            Some(AgencyId(1))
        );
    }

    #[test]
    fn fire_has_no_mutual_aid() {
        let fire = AgencySpec::new(
            "City FD",
            AgencyKind::FireDepartment,
            AllocatorSpec::Numeric(NumericBands::fire_rescue()),
        )
        .zones([ZoneId(0)]);
        let c = CoordinatorBuilder::new(config()).agency(fire).agency(county(0)).build().unwrap();
        assert_eq!(escalation_target(c.agencies(), AgencyId(0), ZoneId(0), CallCategory::Emergency), None);
    }

    #[test]
    fn jurisdiction_lists_local_before_statewide() {
        let mut dir = StaticZoneDirectory::new();
        dir.add_agency(AgencyId(0), Vec::new(), true);
        dir.add_agency(AgencyId(1), vec![ZoneId(0)], false);
        dir.add_agency(AgencyId(2), vec![ZoneId(0), ZoneId(1)], false);
        assert_eq!(dir.jurisdiction_agencies(ZoneId(0)), vec![AgencyId(1), AgencyId(2), AgencyId(0)]);
        assert_eq!(dir.jurisdiction_agencies(ZoneId(1)), vec![AgencyId(2), AgencyId(0)]);
        assert_eq!(dir.jurisdiction_agencies(ZoneId(9)), vec![AgencyId(0)]);
    }

    #[test]
    fn zone_of_picks_nearest_centre() {
        let dir = StaticZoneDirectory::new()
            .with_centre(ZoneId(0), Position::flat(0.0, 0.0))
            .with_centre(ZoneId(1), Position::flat(1_000.0, 0.0));
        assert_eq!(dir.zone_of(Position::flat(900.0, 10.0)), Some(ZoneId(1)));
        assert_eq!(dir.zone_of(Position::flat(-50.0, 0.0)), Some(ZoneId(0)));
        assert_eq!(StaticZoneDirectory::new().zone_of(Position::flat(0.0, 0.0)), None);
    }
}

// ── UnitDispatcher ────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatcher_tests {
    use super::*;
    use crate::{AssignmentPolicy, CallBoard, UnitDispatcher};

    #[test]
    fn add_call_for_unknown_call_is_ignored() {
        let mut d = UnitDispatcher::new(AgencyId(0), AssignmentPolicy::Jurisdiction, [ZoneId(0)]);
        assert!(!d.add_call(CallId(3), &CallBoard::new(), Tick(0)));
        assert_eq!(d.pending_len(), 0);
    }

    #[test]
    #[should_panic(expected = "used after dispose")]
    fn disposed_dispatcher_panics() {
        let mut d = UnitDispatcher::new(AgencyId(0), AssignmentPolicy::Statewide, Vec::new());
        d.dispose();
        d.add_call(CallId(0), &CallBoard::new(), Tick(0));
    }

    #[test]
    fn reported_call_is_queued_once() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).build().unwrap();
        assert!(c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0)));
        let call = only_call(&c, 1);
        let board = &c.board;
        let d = &mut c.dispatchers[0];
        assert!(d.contains(call));
        assert!(!d.add_call(call, board, Tick(0)));
        assert_eq!(d.pending(), vec![call]);
    }

    #[test]
    fn nearest_unit_is_sent() {
        let spec = AgencySpec::new("City PD", AgencyKind::CityPolice, police_signs())
            .zones([ZoneId(0)])
            .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, 1, Position::flat(1_000.0, 0.0)))
            .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, 1, Position::flat(20.0, 0.0)));
        let mut c = CoordinatorBuilder::new(config()).agency(spec).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        step(&mut c, &mut clock, 1);

        let call = only_call(&c, 1);
        let near = c.roster().iter().find(|u| u.home == Position::flat(20.0, 0.0)).unwrap().id;
        let far = c.roster().iter().find(|u| u.home == Position::flat(1_000.0, 0.0)).unwrap().id;
        assert_eq!(c.roster().get(near).unwrap().current_call(), Some(call));
        assert_eq!(c.roster().get(far).unwrap().status(), UnitStatus::Available);
        assert_eq!(c.board().call(call).unwrap().primary(), Some(near));
    }

    #[test]
    fn urgent_call_served_first() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Routine), 0.0, 0));
        c.report(event(2, burglary(2, Priority::Immediate), 500.0, 0));
        step(&mut c, &mut clock, 1);

        let unit = c.roster().iter().next().unwrap();
        assert_eq!(unit.current_call(), Some(only_call(&c, 2)));
    }

    #[test]
    fn unattended_call_expires() {
        let template = Arc::new((*burglary(1, Priority::Routine)).clone().with_expiry(2));
        let mut c = CoordinatorBuilder::new(config()).agency(city(0)).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, template, 0.0, 0));
        let call = only_call(&c, 1);

        step(&mut c, &mut clock, 3);
        assert!(c.board().call(call).is_some());
        step(&mut c, &mut clock, 1);
        assert!(c.board().call(call).is_none());
        assert!(lifecycle(&mut c).contains(&Lifecycle::CallExpired(call)));
        assert_eq!(c.take_released_locations(), vec![LocationId(1)]);
    }

    #[test]
    fn unserved_call_raised_to_county() {
        let mut c = CoordinatorBuilder::new(config())
            .agency(city(0))
            .agency(county(1))
            .behavior(IdleBehavior)
            .build()
            .unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        let call = only_call(&c, 1);
        assert_eq!(c.board().call(call).unwrap().agency, AgencyId(0));

        // Waits the default three ticks before asking for help.
        step(&mut c, &mut clock, 3);
        assert!(!c.dispatcher(AgencyId(1)).unwrap().contains(call));
        step(&mut c, &mut clock, 1);
        assert!(c.dispatcher(AgencyId(0)).unwrap().is_raised(call));
        assert!(c.dispatcher(AgencyId(1)).unwrap().contains(call));
        let entries = lifecycle(&mut c);
        assert!(entries.contains(&Lifecycle::CallRaised { call, from: AgencyId(0), to: AgencyId(1) }));

        step(&mut c, &mut clock, 1);
        let deputy = c.roster().by_agency(AgencyId(1)).next().unwrap();
        assert_eq!(deputy.current_call(), Some(call));
    }

    #[test]
    fn call_outside_jurisdiction_is_not_worked() {
        let mut c = CoordinatorBuilder::new(config()).agency(county(1)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 1));
        let call = only_call(&c, 1);
        c.board.call_mut(call).unwrap().zone = ZoneId(7);
        step(&mut c, &mut clock, 1);
        assert_eq!(c.roster().iter().next().unwrap().current_call(), None);
    }
}

// ── Reporting and closing ─────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use crate::{DispatchObserver, NoopObserver};

    #[test]
    fn report_without_jurisdiction_is_dropped() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).build().unwrap();
        assert!(!c.report(event(1, burglary(1, Priority::Routine), 0.0, 9)));
        assert_eq!(c.board().event_count(), 0);
        assert_eq!(c.take_released_locations(), vec![LocationId(1)]);
    }

    #[test]
    fn duplicate_report_is_rejected() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).build().unwrap();
        assert!(c.report(event(1, burglary(1, Priority::Routine), 0.0, 0)));
        assert!(!c.report(event(1, burglary(1, Priority::Routine), 0.0, 0)));
        assert_eq!(c.board().call_count(), 1);
    }

    #[test]
    fn one_call_per_sector() {
        let template = Arc::new(
            ScenarioTemplate::new(ScenarioId(5), "Structure fire", CallCategory::Emergency, LocationKind::Residence)
                .with_directive(ServiceSector::Police, DispatchDirective::new(1, Priority::Emergency, ResponseCode::Code3))
                .with_directive(ServiceSector::Fire, DispatchDirective::new(2, Priority::Immediate, ResponseCode::Code3)),
        );
        let fire = AgencySpec::new(
            "City FD",
            AgencyKind::FireDepartment,
            AllocatorSpec::Numeric(NumericBands::fire_rescue()),
        )
        .zones([ZoneId(0)]);
        let mut c = CoordinatorBuilder::new(config()).agency(city(0)).agency(fire).build().unwrap();
        assert!(c.report(event(1, template, 0.0, 0)));

        let calls = c.board().calls_of(EventId(1));
        assert_eq!(calls.len(), 2);
        let owners: Vec<(ServiceSector, AgencyId)> =
            calls.iter().map(|id| c.board().call(*id).unwrap()).map(|r| (r.sector, r.agency)).collect();
        assert!(owners.contains(&(ServiceSector::Police, AgencyId(0))));
        assert!(owners.contains(&(ServiceSector::Fire, AgencyId(1))));
        assert_eq!(c.board().bucket(Priority::Immediate).len(), 1);
        assert_eq!(lifecycle(&mut c).len(), 2);
    }

    #[test]
    fn closing_a_call_runs_the_cascade() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        let call = only_call(&c, 1);
        step(&mut c, &mut clock, 1);
        let unit = c.roster().iter().next().unwrap().id;
        assert_eq!(c.roster().get(unit).unwrap().current_call(), Some(call));
        assert!(c.dispatcher(AgencyId(0)).unwrap().contains(call));
        lifecycle(&mut c);

        assert!(c.close_call(call, CloseFlag::Completed));
        assert!(!c.dispatcher(AgencyId(0)).unwrap().contains(call));
        assert!(c.board().call(call).is_none());
        assert!(!c.board().contains_event(EventId(1)));
        assert!(c.board().bucket(Priority::Expedited).is_empty());
        assert_eq!(c.roster().get(unit).unwrap().status(), UnitStatus::Available);
        assert_eq!(lifecycle(&mut c), vec![Lifecycle::CallCompleted { call, flag: CloseFlag::Completed }]);
        assert_eq!(c.take_released_locations(), vec![LocationId(1)]);

        // Second close is a no-op.
        assert!(!c.close_call(call, CloseFlag::Forced));
    }

    #[test]
    fn event_stays_open_until_its_last_call_closes() {
        let template = Arc::new(
            (*burglary(1, Priority::Expedited))
                .clone()
                .with_directive(ServiceSector::Medical, DispatchDirective::new(1, Priority::Expedited, ResponseCode::Code2)),
        );
        let ems = AgencySpec::new("County EMS", AgencyKind::Ems, AllocatorSpec::Numeric(NumericBands::fire_rescue()))
            .zones([ZoneId(0)]);
        let mut c = CoordinatorBuilder::new(config()).agency(city(0)).agency(ems).build().unwrap();
        c.report(event(1, template, 0.0, 0));
        let calls = c.board().calls_of(EventId(1));
        assert_eq!(calls.len(), 2);

        c.close_call(calls[0], CloseFlag::Completed);
        assert!(c.board().contains_event(EventId(1)));
        c.close_call(calls[1], CloseFlag::Completed);
        assert!(!c.board().contains_event(EventId(1)));
    }

    #[test]
    fn close_event_closes_every_call() {
        let template = Arc::new(
            (*burglary(1, Priority::Expedited))
                .clone()
                .with_directive(ServiceSector::Medical, DispatchDirective::new(1, Priority::Expedited, ResponseCode::Code2)),
        );
        let ems = AgencySpec::new("County EMS", AgencyKind::Ems, AllocatorSpec::Numeric(NumericBands::fire_rescue()))
            .zones([ZoneId(0)]);
        let mut c = CoordinatorBuilder::new(config()).agency(city(0)).agency(ems).build().unwrap();
        c.report(event(1, template, 0.0, 0));
        assert!(c.close_event(EventId(1), CloseFlag::Forced));
        assert_eq!(c.board().call_count(), 0);
        assert!(!c.close_event(EventId(1), CloseFlag::Forced));
    }

    #[test]
    fn shifts_toggle_duty() {
        // 13:58, two ticks before the swing shift.
        let cfg = DispatchConfig { start_unix_secs: 13 * 3_600 + 58 * 60, ..config() };
        let spec = city(2).units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Swing, 1, Position::flat(0.0, 0.0)));
        let mut c = CoordinatorBuilder::new(cfg).agency(spec).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();

        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        step(&mut c, &mut clock, 1);
        let busy = c.roster().iter().find(|u| u.current_call().is_some()).unwrap().id;
        let on: Vec<bool> = c.roster().iter().map(|u| u.on_duty).collect();
        assert_eq!(on, vec![true, true, false]);

        step(&mut c, &mut clock, 2);
        let entries = lifecycle(&mut c);
        assert_eq!(
            entries
                .iter()
                .filter(|e| matches!(e, Lifecycle::ShiftStarted(_) | Lifecycle::ShiftEnded(_)))
                .copied()
                .collect::<Vec<_>>(),
            vec![
                Lifecycle::ShiftStarted(ShiftRotation::Day),
                Lifecycle::ShiftEnded(ShiftRotation::Day),
                Lifecycle::ShiftStarted(ShiftRotation::Swing),
            ]
        );
        let idle_day = c.roster().iter().find(|u| u.shift == ShiftRotation::Day && u.id != busy).unwrap();
        assert!(!idle_day.on_duty);
        let swing = c.roster().iter().find(|u| u.shift == ShiftRotation::Swing).unwrap();
        assert!(swing.on_duty);

        // The busy day unit finishes its call before going home.
        let relieved = c.roster().get(busy).unwrap();
        assert!(relieved.on_duty && relieved.relieved);
        c.close_call(only_call(&c, 1), CloseFlag::Completed);
        let done = c.roster().get(busy).unwrap();
        assert!(!done.on_duty && !done.relieved);
    }

    #[test]
    fn lifecycle_reaches_observer_in_order() {
        #[derive(Default)]
        struct Log(Vec<&'static str>);
        impl DispatchObserver for Log {
            fn on_shift_start(&mut self, _tick: Tick, _shift: ShiftRotation) {
                self.0.push("shift");
            }
            fn on_call_added(&mut self, _t: Tick, _c: CallId, _e: EventId, _a: AgencyId, _p: Priority) {
                self.0.push("added");
            }
            fn on_call_completed(&mut self, _tick: Tick, _call: CallId, _flag: CloseFlag) {
                self.0.push("completed");
            }
        }

        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        step(&mut c, &mut clock, 1);
        c.close_call(only_call(&c, 1), CloseFlag::Completed);

        let mut log = Log::default();
        c.drain_lifecycle(&mut log);
        assert_eq!(log.0, vec!["added", "shift", "completed"]);
        c.drain_lifecycle(&mut NoopObserver);
    }

    #[test]
    fn shutdown_disposes_dispatchers() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).agency(county(1)).build().unwrap();
        c.report(event(1, burglary(1, Priority::Expedited), 0.0, 0));
        c.shutdown();
        assert!(c.dispatchers.iter().all(|d| d.is_disposed()));
    }
}

// ── Reassignment ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reassignment_tests {
    use super::*;

    /// One city unit on scene as primary of event 1.
    fn on_scene(priority: Priority) -> (DispatchCoordinator, dispatch_core::UnitId, CallId) {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, priority), 0.0, 0));
        step(&mut c, &mut clock, 1);
        let call = only_call(&c, 1);
        let unit = c.roster().iter().next().unwrap().id;
        assert!(c.roster.get_mut(unit).unwrap().arrive(Position::flat(0.0, 0.0)));
        assert!(c.roster().get(unit).unwrap().is_primary_on_call());
        lifecycle(&mut c);
        (c, unit, call)
    }

    #[test]
    fn primary_pulled_for_urgent_call_closes_old_call_premature() {
        let (mut c, unit, old) = on_scene(Priority::Routine);
        c.report(event(2, burglary(2, Priority::Immediate), 300.0, 0));
        let new = only_call(&c, 2);

        assert!(c.assign_unit_to_call(unit, new).unwrap());
        assert!(c.board().call(old).is_none());
        assert!(lifecycle(&mut c).contains(&Lifecycle::CallCompleted { call: old, flag: CloseFlag::Premature }));

        let u = c.roster().get(unit).unwrap();
        assert_eq!(u.current_call(), Some(new));
        assert!(u.is_primary_on_call());
        assert_eq!(u.status(), UnitStatus::Dispatched);
        assert_eq!(c.board().call(new).unwrap().primary(), Some(unit));
    }

    #[test]
    fn pull_to_equal_priority_is_forced() {
        let (mut c, unit, old) = on_scene(Priority::Expedited);
        c.report(event(2, burglary(2, Priority::Expedited), 300.0, 0));
        let new = only_call(&c, 2);

        c.assign_unit_to_call(unit, new).unwrap();
        assert!(lifecycle(&mut c).contains(&Lifecycle::CallCompleted { call: old, flag: CloseFlag::Forced }));
    }

    #[test]
    fn urgent_scene_is_only_left() {
        let (mut c, unit, old) = on_scene(Priority::Emergency);
        c.report(event(2, burglary(2, Priority::Immediate), 300.0, 0));
        let new = only_call(&c, 2);

        c.assign_unit_to_call(unit, new).unwrap();
        let left = c.board().call(old).unwrap();
        assert!(left.is_open());
        assert!(left.attached().is_empty());
        assert!(c.dispatcher(AgencyId(0)).unwrap().contains(old));
    }

    #[test]
    fn moved_unit_takes_over_as_primary() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(2)).behavior(IdleBehavior).build().unwrap();
        let mut clock = c.config().make_clock();
        c.report(event(1, burglary(1, Priority::Routine), 0.0, 0));
        step(&mut c, &mut clock, 1);
        let old = only_call(&c, 1);
        let a = c.board().call(old).unwrap().primary().unwrap();
        let b = c.roster().iter().map(|u| u.id).find(|&u| u != a).unwrap();
        assert!(c.roster.get_mut(a).unwrap().arrive(Position::flat(0.0, 0.0)));

        c.report(event(2, burglary(2, Priority::Immediate), 300.0, 0));
        let new = only_call(&c, 2);
        assert!(c.assign_unit_to_call(b, new).unwrap());
        assert_eq!(c.board().call(new).unwrap().primary(), Some(b));

        assert!(c.assign_unit_to_call(a, new).unwrap());
        assert!(c.board().call(old).is_none());
        let call = c.board().call(new).unwrap();
        assert_eq!(call.primary(), Some(a));
        assert!(call.is_attached(b));
        assert!(c.roster().get(a).unwrap().is_primary_on_call());
        let support = c.roster().get(b).unwrap();
        assert_eq!(support.current_call(), Some(new));
        assert!(!support.is_primary_on_call());
    }

    #[test]
    fn assigning_twice_is_a_no_op() {
        let (mut c, unit, old) = on_scene(Priority::Routine);
        assert!(!c.assign_unit_to_call(unit, old).unwrap());
        assert!(c.assign_unit_to_call(unit, CallId(99)).is_err());
    }
}

// ── Human unit ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod player_tests {
    use super::*;

    #[test]
    fn most_urgent_call_is_picked_for_player() {
        let (mut c, _host, _clock) = player_only();
        c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0));
        c.report(event(2, burglary(2, Priority::Immediate), 900.0, 0));
        assert_eq!(c.next_call_for_player(), Some(only_call(&c, 2)));
    }

    #[test]
    fn off_duty_player_gets_nothing() {
        let (mut c, _host, _clock) = player_only();
        c.end_duty().unwrap();
        c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0));
        assert_eq!(c.next_call_for_player(), None);
    }

    #[test]
    fn request_call_assigns_player() {
        let (mut c, _host, _clock) = player_only();
        c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0));
        let call = only_call(&c, 1);
        assert_eq!(c.request_call_for_player().unwrap(), Some(call));
        let me = c.player_unit().unwrap();
        assert_eq!(c.board().call(call).unwrap().primary(), Some(me));
        assert!(!c.player_ready());
    }

    #[test]
    fn callout_without_acceptance_starts_directly() {
        let (mut c, host, mut clock) = player_only();
        c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0));
        let call = only_call(&c, 1);
        step(&mut c, &mut clock, 2);

        assert_eq!(c.active_callout(), Some(call));
        assert_eq!(host.0.borrow().started, vec![call]);
        assert!(host.0.borrow().offered.is_empty());
        assert!(!host.0.borrow().available);
    }

    /// An offered call: dispatched at tick 0, offered at tick 1.
    fn offered() -> (DispatchCoordinator, RecordingHost, SimClock, CallId) {
        let (mut c, host, mut clock) = player_only();
        c.report(event(1, offered_burglary(1, Priority::Expedited), 10.0, 0));
        let call = only_call(&c, 1);
        step(&mut c, &mut clock, 2);
        (c, host, clock, call)
    }

    #[test]
    fn offer_waits_for_an_answer() {
        let (c, host, _clock, call) = offered();
        assert_eq!(c.waiting_call(), Some(call));
        assert_eq!(c.board().call(call).unwrap().status(), dispatch_call::CallStatus::Waiting);
        assert_eq!(host.0.borrow().offered, vec![call]);
        assert!(host
            .0
            .borrow()
            .notes
            .iter()
            .any(|n| matches!(n, Notification::Radio { call: radioed, text, .. } if *radioed == call && text.contains("code 2"))));
    }

    #[test]
    fn declined_call_goes_back_to_the_pool() {
        let (mut c, _host, mut clock, call) = offered();
        let me = c.player_unit().unwrap();
        assert!(c.signal_sender().send(HostSignal::Declined(call)));
        step(&mut c, &mut clock, 1);

        assert_eq!(c.waiting_call(), None);
        let record = c.board().call(call).unwrap();
        assert!(record.was_declined_by(me));
        assert!(record.attached().is_empty());
        assert_eq!(record.status(), dispatch_call::CallStatus::Created);
        assert!(c.board().event(EventId(1)).unwrap().declined_by_player);
        assert_eq!(c.roster().get(me).unwrap().status(), UnitStatus::Available);
        // Cooldown restarted.
        assert!(!c.player_ready());
        assert_eq!(c.next_call_for_player(), Some(call));
    }

    #[test]
    fn unanswered_offer_times_out() {
        let (mut c, host, mut clock, call) = offered();
        // Offered at tick 1; declined once 20 ticks have passed.
        step(&mut c, &mut clock, 19);
        assert_eq!(c.waiting_call(), Some(call));
        step(&mut c, &mut clock, 1);
        assert_eq!(c.waiting_call(), None);
        assert_eq!(host.0.borrow().stopped, vec![call]);
        assert!(c.board().call(call).unwrap().was_declined_by(c.player_unit().unwrap()));
    }

    #[test]
    fn accepted_callout_runs_to_completion() {
        let (mut c, host, mut clock, call) = offered();
        let me = c.player_unit().unwrap();
        let tx = c.signal_sender();

        tx.send(HostSignal::Accepted(call));
        step(&mut c, &mut clock, 1);
        assert_eq!(c.active_callout(), Some(call));
        assert_eq!(host.0.borrow().started, vec![call]);

        tx.send(HostSignal::Started { call, scenario: ScenarioId(1) });
        step(&mut c, &mut clock, 1);
        assert_eq!(c.roster().get(me).unwrap().status(), UnitStatus::OnScene);
        assert_eq!(c.board().call(call).unwrap().status(), dispatch_call::CallStatus::OnScene);

        lifecycle(&mut c);
        tx.send(HostSignal::Finished(call));
        step(&mut c, &mut clock, 1);
        assert_eq!(c.active_callout(), None);
        assert!(c.board().call(call).is_none());
        assert_eq!(c.roster().get(me).unwrap().status(), UnitStatus::Available);
        assert!(host.0.borrow().stopped.is_empty());
        assert!(host.0.borrow().available);
        assert!(lifecycle(&mut c).contains(&Lifecycle::CallCompleted { call, flag: CloseFlag::Completed }));
    }

    #[test]
    fn scenario_mismatch_forces_the_call_closed() {
        let (mut c, host, mut clock, call) = offered();
        let tx = c.signal_sender();
        tx.send(HostSignal::Accepted(call));
        step(&mut c, &mut clock, 1);
        lifecycle(&mut c);

        tx.send(HostSignal::Started { call, scenario: ScenarioId(99) });
        step(&mut c, &mut clock, 1);
        assert!(c.board().call(call).is_none());
        assert_eq!(c.active_callout(), None);
        assert_eq!(host.0.borrow().stopped, vec![call]);
        assert!(lifecycle(&mut c).contains(&Lifecycle::CallCompleted { call, flag: CloseFlag::Forced }));
    }

    #[test]
    fn stray_answers_are_ignored() {
        let (mut c, _host, mut clock, call) = offered();
        c.signal_sender().send(HostSignal::Accepted(CallId(42)));
        step(&mut c, &mut clock, 1);
        assert_eq!(c.waiting_call(), Some(call));
        assert_eq!(c.active_callout(), None);
    }

    #[test]
    fn external_callout_suspends_handoff() {
        let (mut c, host, mut clock) = player_only();
        host.0.borrow_mut().running = Some(ScenarioId(42));
        c.report(event(1, burglary(1, Priority::Expedited), 10.0, 0));
        let me = c.player_unit().unwrap();

        step(&mut c, &mut clock, 1);
        assert!(c.external_callout_running());
        assert!(!c.player_ready());
        assert_eq!(c.roster().get(me).unwrap().current_call(), None);

        host.0.borrow_mut().running = None;
        step(&mut c, &mut clock, 1);
        assert!(!c.external_callout_running());
        assert_eq!(c.roster().get(me).unwrap().current_call(), Some(only_call(&c, 1)));
    }

    #[test]
    fn end_duty_abandons_the_call() {
        let (mut c, host, _clock, call) = offered();
        let me = c.player_unit().unwrap();
        c.end_duty().unwrap();
        assert_eq!(c.waiting_call(), None);
        assert!(!c.board().call(call).unwrap().is_attached(me));
        assert_eq!(host.0.borrow().stopped, vec![call]);
        assert!(!c.roster().get(me).unwrap().on_duty);
    }

    #[test]
    fn duty_without_player_is_an_error() {
        let mut c = CoordinatorBuilder::new(config()).agency(city(1)).build().unwrap();
        assert!(c.start_duty().is_err());
        assert_eq!(c.request_call_for_player().unwrap(), None);
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod simulation_tests {
    use dispatch_core::{CategoryTable, PeriodTable, SimRng};
    use dispatch_gen::{EventGenerator, GeneratorConfig, StaticLocations, ZoneProfile};
    use dispatch_unit::DefaultBehavior;

    use super::*;
    use crate::{DispatchObserver, Simulation};

    #[derive(Default)]
    struct Counts {
        ticks:      u64,
        added:      usize,
        closed:     usize,
        levels:     usize,
        final_tick: Option<Tick>,
    }

    impl DispatchObserver for Counts {
        fn on_tick_end(&mut self, _tick: Tick, _open_calls: usize) {
            self.ticks += 1;
        }
        fn on_call_added(&mut self, _t: Tick, _c: CallId, _e: EventId, _a: AgencyId, _p: Priority) {
            self.added += 1;
        }
        fn on_call_completed(&mut self, _tick: Tick, _call: CallId, _flag: CloseFlag) {
            self.closed += 1;
        }
        fn on_call_expired(&mut self, _tick: Tick, _call: CallId) {
            self.closed += 1;
        }
        fn on_activity_level_changed(
            &mut self,
            _tick: Tick,
            _period: dispatch_core::TimePeriod,
            _level: dispatch_gen::ActivityLevel,
        ) {
            self.levels += 1;
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.final_tick = Some(final_tick);
        }
    }

    fn simulation(seed: u64) -> Simulation {
        let cfg = DispatchConfig { seed, total_ticks: 240, ..config() };
        let coordinator = CoordinatorBuilder::new(cfg.clone())
            .agency(city(4))
            .agency(county(2))
            .behavior(DefaultBehavior::default())
            .build()
            .unwrap();

        let property_only = CategoryTable([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let zones = vec![ZoneProfile::new(ZoneId(0), "Downtown", PeriodTable([4.0; 4])).with_category_weights(property_only)];
        let templates = vec![Arc::new((*burglary(1, Priority::Expedited)).clone().with_expiry(60))];
        let mut root = SimRng::new(seed);
        let generator = EventGenerator::new(GeneratorConfig::default(), zones, templates, root.child(2)).unwrap();
        let spots = (0..8)
            .map(|i| {
                Location::new(
                    LocationId(i),
                    ZoneId(0),
                    Position::flat(i as f32 * 150.0, 40.0),
                    LocationKind::Residence,
                    format!("{} Elm St", 100 + i),
                )
            })
            .collect();
        Simulation::new(coordinator, generator, StaticLocations::new(spots, root.child(3)))
    }

    #[test]
    fn runs_to_end_tick() {
        let mut sim = simulation(11);
        let mut counts = Counts::default();
        sim.run(&mut counts).unwrap();

        assert_eq!(counts.ticks, 240);
        assert_eq!(counts.final_tick, Some(Tick(240)));
        assert_eq!(sim.now(), Tick(240));
        assert!(counts.levels >= 1);
        assert_eq!(counts.added, counts.closed + sim.coordinator.board().call_count());
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |seed| {
            let mut sim = simulation(seed);
            let mut counts = Counts::default();
            sim.run(&mut counts).unwrap();
            (counts.added, counts.closed, sim.coordinator.board().call_count())
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = simulation(3);
        let mut counts = Counts::default();
        sim.run_ticks(10, &mut counts).unwrap();
        assert_eq!(sim.now(), Tick(10));
        assert_eq!(counts.final_tick, None);
    }

    #[test]
    fn weather_reaches_the_coordinator() {
        let mut sim = simulation(3);
        sim.set_weather(dispatch_core::Weather::Rain);
        assert_eq!(sim.coordinator.weather(), dispatch_core::Weather::Rain);
    }
}
