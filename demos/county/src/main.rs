//! county — one simulated day of dispatch in Bay County.
//!
//! Five agencies, four zones, and one human-controlled patrol unit whose
//! "player" is scripted: it accepts every offer, reaches the scene a few
//! ticks later, and clears after a fixed time.  Set `RUST_LOG=debug` to see
//! every assignment.

mod region;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dispatch_call::CloseFlag;
use dispatch_core::{
    AgencyId, CallId, DispatchConfig, EventId, Priority, ScenarioId, ShiftRotation, SimRng, Tick,
    TimePeriod,
};
use dispatch_gen::{ActivityLevel, EventGenerator, GeneratorConfig, StaticLocations};
use dispatch_sim::{
    CoordinatorBuilder, DispatchObserver, HostCalloutBridge, HostSignal, Notification,
    PresentationSink, Simulation,
};
use dispatch_unit::DefaultBehavior;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:               u64 = 2_024;
const TICK_DURATION_SECS: u32 = 60; // 1 tick = 1 simulated minute
const SIM_HOURS:          u64 = 24;
const TICKS_TO_SCENE:     u64 = 6;
const TICKS_ON_SCENE:     u64 = 25;

// ── Scripted host ─────────────────────────────────────────────────────────────

/// What the host side has been asked to do, shared with the driving loop.
#[derive(Default)]
struct HostState {
    offers:    Vec<CallId>,
    starts:    Vec<(CallId, ScenarioId)>,
    available: bool,
    radio:     usize,
}

#[derive(Clone)]
struct ScriptedHost(Rc<RefCell<HostState>>);

impl HostCalloutBridge for ScriptedHost {
    fn offer_callout(&mut self, call: CallId, _scenario: ScenarioId) {
        self.0.borrow_mut().offers.push(call);
    }

    fn start_callout(&mut self, call: CallId, scenario: ScenarioId) {
        self.0.borrow_mut().starts.push((call, scenario));
    }

    fn stop_callout(&mut self, call: CallId) {
        info!(%call, "host: callout aborted");
    }

    fn running_callout(&self) -> Option<ScenarioId> {
        None
    }

    fn player_available(&self) -> bool {
        self.0.borrow().available
    }

    fn set_player_available(&mut self, available: bool) {
        self.0.borrow_mut().available = available;
    }
}

impl PresentationSink for ScriptedHost {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Radio { text, .. } => {
                self.0.borrow_mut().radio += 1;
                info!(target: "county::radio", "{text}");
            }
            Notification::ShiftStarted(shift) => info!("{shift} shift on duty"),
            Notification::ShiftEnded(shift) => info!("{shift} shift ending"),
            Notification::Operator(text) => info!("operator: {text}"),
        }
    }
}

/// The "player": answers offers and drives the callout through its stages.
#[derive(Default)]
struct PlayerScript {
    /// (due tick, signal) in due order.
    queue:    Vec<(Tick, HostSignal)>,
    accepted: usize,
    finished: usize,
}

impl PlayerScript {
    fn react(&mut self, now: Tick, host: &ScriptedHost) {
        let mut state = host.0.borrow_mut();
        for call in state.offers.drain(..) {
            self.queue.push((now + 1, HostSignal::Accepted(call)));
            self.accepted += 1;
        }
        for (call, scenario) in state.starts.drain(..) {
            self.queue.push((now + TICKS_TO_SCENE, HostSignal::Started { call, scenario }));
            self.queue.push((now + TICKS_TO_SCENE + TICKS_ON_SCENE, HostSignal::Finished(call)));
        }
    }

    fn due(&mut self, now: Tick) -> Vec<HostSignal> {
        let (due, later): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|(t, _)| *t <= now);
        self.queue = later;
        let signals: Vec<HostSignal> = due.into_iter().map(|(_, s)| s).collect();
        self.finished += signals.iter().filter(|s| matches!(s, HostSignal::Finished(_))).count();
        signals
    }
}

// ── Summary observer ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Summary {
    added:      usize,
    by_agency:  BTreeMap<AgencyId, usize>,
    closed:     BTreeMap<&'static str, usize>,
    raised:     usize,
    urgent:     usize,
    peak_open:  usize,
    shifts:     usize,
    levels:     Vec<(TimePeriod, ActivityLevel)>,
}

impl DispatchObserver for Summary {
    fn on_tick_end(&mut self, _tick: Tick, open_calls: usize) {
        self.peak_open = self.peak_open.max(open_calls);
    }

    fn on_shift_start(&mut self, _tick: Tick, _shift: ShiftRotation) {
        self.shifts += 1;
    }

    fn on_call_added(&mut self, _tick: Tick, _call: CallId, _event: EventId, agency: AgencyId, priority: Priority) {
        self.added += 1;
        *self.by_agency.entry(agency).or_default() += 1;
        if priority.outranks(Priority::Expedited) {
            self.urgent += 1;
        }
    }

    fn on_call_completed(&mut self, _tick: Tick, _call: CallId, flag: CloseFlag) {
        *self.closed.entry(flag.as_str()).or_default() += 1;
    }

    fn on_call_expired(&mut self, _tick: Tick, _call: CallId) {
        *self.closed.entry(CloseFlag::Expired.as_str()).or_default() += 1;
    }

    fn on_call_raised(&mut self, tick: Tick, call: CallId, from: AgencyId, to: AgencyId) {
        self.raised += 1;
        info!(%tick, %call, %from, %to, "mutual aid");
    }

    fn on_activity_level_changed(&mut self, _tick: Tick, period: TimePeriod, level: ActivityLevel) {
        self.levels.push((period, level));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("county=info,warn")),
        )
        .init();

    println!("=== county — rust_dispatch regional dispatch ===");
    println!("Hours: {SIM_HOURS}  |  Seed: {SEED}");
    println!();

    // 1. Config: start at 05:00 so the first shift change comes early.
    let config = DispatchConfig {
        start_unix_secs:    1_700_000_000 - 1_700_000_000 % 86_400 + 5 * 3_600,
        tick_duration_secs: TICK_DURATION_SECS,
        total_ticks:        SIM_HOURS * 60,
        seed:               SEED,
        ..DispatchConfig::default()
    };

    // 2. Coordinator: agencies, the human unit, and the scripted host.
    let host = ScriptedHost(Rc::new(RefCell::new(HostState { available: true, ..HostState::default() })));
    let mut builder = CoordinatorBuilder::new(config.clone())
        .player(region::player())
        .behavior(DefaultBehavior::default())
        .zones(region::directory())
        .host(host.clone())
        .sink(host.clone());
    for agency in region::agencies() {
        builder = builder.agency(agency);
    }
    let mut coordinator = builder.build()?;
    coordinator.start_duty()?;

    for agency in coordinator.agencies() {
        let staffing = coordinator.staffing(agency.id);
        println!(
            "{:<22} day {:>2}  swing {:>2}  night {:>2}",
            agency.name,
            staffing[ShiftRotation::Day],
            staffing[ShiftRotation::Swing],
            staffing[ShiftRotation::Night],
        );
    }
    println!();

    // 3. Incident generator and location set.
    let mut root = SimRng::new(SEED);
    let generator = EventGenerator::new(
        GeneratorConfig::default(),
        region::zones()?,
        region::templates(),
        root.child(2),
    )?;
    let locations = StaticLocations::new(region::locations(), root.child(3));

    let mut sim = Simulation::new(coordinator, generator, locations);
    let signals = sim.signal_sender();

    // 4. Run, letting the scripted player answer between ticks.
    let mut summary = Summary::default();
    let mut script = PlayerScript::default();
    let t0 = Instant::now();
    while sim.now() < config.end_tick() {
        sim.step(&mut summary)?;
        let now = sim.now();
        script.react(now, &host);
        for signal in script.due(now) {
            signals.send(signal);
        }
    }
    summary.on_sim_end(sim.now());
    sim.coordinator.shutdown();
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock);
    println!("  calls created        : {}", summary.added);
    println!("  priority 1–2 calls   : {}", summary.urgent);
    println!("  mutual-aid requests  : {}", summary.raised);
    println!("  peak open calls      : {}", summary.peak_open);
    println!("  still open at end    : {}", sim.coordinator.board().call_count());
    println!("  shifts started       : {}", summary.shifts);
    for (flag, n) in &summary.closed {
        println!("  closed {flag:<13} : {n}");
    }
    println!();
    println!("Calls per owning agency:");
    for (agency, n) in &summary.by_agency {
        let name = sim.coordinator.agency(*agency).map_or("?", |a| a.name.as_str());
        println!("  {name:<22} {n}");
    }
    println!();
    println!("Activity levels:");
    for (period, level) in &summary.levels {
        println!("  {period:<8} {level}");
    }
    println!();
    println!(
        "Human unit: {} offers accepted, {} callouts finished, {} radio dispatches",
        script.accepted,
        script.finished,
        host.0.borrow().radio,
    );

    // 6. End-of-day board for the city.
    println!();
    println!("{:<12} {:<10} {:<16} {:<6}", "Unit", "Role", "Status", "Duty");
    println!("{}", "-".repeat(46));
    for unit in sim.coordinator.roster_snapshot(AgencyId(0)) {
        println!(
            "{:<12} {:<10} {:<16} {:<6}",
            unit.call_sign,
            unit.role,
            unit.status,
            if unit.on_duty { "on" } else { "off" },
        );
    }

    Ok(())
}
