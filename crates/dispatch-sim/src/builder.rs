//! Fluent builder for constructing a [`DispatchCoordinator`].

use std::collections::VecDeque;

use dispatch_callsign::AllocatorSpec;
use dispatch_core::{
    AgencyId, AgencyKind, CallCategory, CategoryTable, DispatchConfig, IdSequence, Position,
    ShiftRotation, SimRng, Tick, UnitType, Weather, ZoneId,
};
use dispatch_unit::{Controller, DefaultBehavior, ResponderUnit, Roster, UnitBehavior, UnitRngs};
use tracing::{info, warn};

use crate::coordinator::PlayerState;
use crate::{
    host_channel, Agency, CallBoard, DispatchCoordinator, HostCalloutBridge, NullHost,
    PresentationSink, SimError, SimResult, StaticZoneDirectory, UnitDispatcher, ZoneDirectory,
};

// ── Declarative inputs ────────────────────────────────────────────────────────

/// `count` AI units of one kind on one shift.
#[derive(Clone, Debug)]
pub struct UnitSpec {
    pub unit_type:  UnitType,
    pub supervisor: bool,
    pub shift:      ShiftRotation,
    pub count:      usize,
    /// Where the units wait between calls.
    pub home:       Position,
    pub secondary:  Option<UnitType>,
}

impl UnitSpec {
    pub fn new(unit_type: UnitType, shift: ShiftRotation, count: usize, home: Position) -> Self {
        Self { unit_type, supervisor: false, shift, count, home, secondary: None }
    }

    pub fn supervisors(mut self) -> Self {
        self.supervisor = true;
        self
    }

    pub fn with_secondary_role(mut self, role: UnitType) -> Self {
        self.secondary = Some(role);
        self
    }
}

/// One agency to create.
#[derive(Clone, Debug)]
pub struct AgencySpec {
    pub name:       String,
    pub kind:       AgencyKind,
    pub zones:      Vec<ZoneId>,
    /// Categories served.  `None` serves every category.
    pub categories: Option<Vec<CallCategory>>,
    pub call_signs: AllocatorSpec,
    pub units:      Vec<UnitSpec>,
}

impl AgencySpec {
    pub fn new(name: impl Into<String>, kind: AgencyKind, call_signs: AllocatorSpec) -> Self {
        Self {
            name: name.into(),
            kind,
            zones: Vec::new(),
            categories: None,
            call_signs,
            units: Vec::new(),
        }
    }

    pub fn zones(mut self, zones: impl IntoIterator<Item = ZoneId>) -> Self {
        self.zones.extend(zones);
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = CallCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn units(mut self, units: UnitSpec) -> Self {
        self.units.push(units);
        self
    }
}

/// The human-controlled unit.
#[derive(Clone, Debug)]
pub struct PlayerSpec {
    /// Index of the agency in builder order.
    pub agency:    AgencyId,
    pub unit_type: UnitType,
    pub position:  Position,
}

// ── CoordinatorBuilder ────────────────────────────────────────────────────────

/// Fluent builder for [`DispatchCoordinator`].
///
/// # Required inputs
///
/// - [`DispatchConfig`]
/// - at least one [`AgencySpec`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                   |
/// |-------------------|-------------------------------------------|
/// | `.behavior(b)`    | [`DefaultBehavior`]                       |
/// | `.zones(d)`       | [`StaticZoneDirectory`] from the agencies |
/// | `.host(h)`        | [`NullHost`]                              |
/// | `.sink(s)`        | [`NullHost`]                              |
/// | `.player(p)`      | no human unit                             |
///
/// # Example
///
/// ```rust,ignore
/// let coordinator = CoordinatorBuilder::new(config)
///     .agency(AgencySpec::new("City PD", AgencyKind::CityPolice, police_signs)
///         .zones([ZoneId(0)])
///         .units(UnitSpec::new(UnitType::Patrol, ShiftRotation::Day, 6, station)))
///     .build()?;
/// ```
pub struct CoordinatorBuilder {
    config:   DispatchConfig,
    agencies: Vec<AgencySpec>,
    player:   Option<PlayerSpec>,
    behavior: Option<Box<dyn UnitBehavior>>,
    zones:    Option<Box<dyn ZoneDirectory>>,
    host:     Option<Box<dyn HostCalloutBridge>>,
    sink:     Option<Box<dyn PresentationSink>>,
}

impl CoordinatorBuilder {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            agencies: Vec::new(),
            player:   None,
            behavior: None,
            zones:    None,
            host:     None,
            sink:     None,
        }
    }

    /// Add an agency.  Agencies get ids in the order they are added.
    pub fn agency(mut self, spec: AgencySpec) -> Self {
        self.agencies.push(spec);
        self
    }

    pub fn player(mut self, player: PlayerSpec) -> Self {
        self.player = Some(player);
        self
    }

    pub fn behavior<B: UnitBehavior>(mut self, behavior: B) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn zones<Z: ZoneDirectory + 'static>(mut self, zones: Z) -> Self {
        self.zones = Some(Box::new(zones));
        self
    }

    pub fn host<H: HostCalloutBridge + 'static>(mut self, host: H) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn sink<S: PresentationSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Validate inputs, draw call signs, create every unit, and return a
    /// ready coordinator.
    ///
    /// A unit whose call-sign pool is exhausted is skipped with a warning.
    /// The human unit must get a sign.
    pub fn build(self) -> SimResult<DispatchCoordinator> {
        let config = self.config;
        if config.tick_duration_secs == 0 {
            return Err(SimError::Config("tick_duration_secs must be positive".into()));
        }
        if self.agencies.is_empty() {
            return Err(SimError::Config("at least one agency is required".into()));
        }

        let mut root = SimRng::new(config.seed);
        let mut sign_rng = root.child(1);

        // ── Agencies ──────────────────────────────────────────────────────
        let mut agencies = Vec::with_capacity(self.agencies.len());
        let mut unit_specs = Vec::with_capacity(self.agencies.len());
        for (i, spec) in self.agencies.into_iter().enumerate() {
            let id = AgencyId::try_from(i)
                .map_err(|_| SimError::Config(format!("too many agencies ({i})")))?;
            if spec.zones.is_empty() && !spec.kind.is_statewide() {
                return Err(SimError::Config(format!("agency {:?} has no jurisdiction", spec.name)));
            }
            let categories = CategoryTable::from_fn(|c| {
                spec.categories.as_ref().is_none_or(|served| served.contains(&c))
            });
            let call_signs = spec.call_signs.build(&mut sign_rng)?;
            agencies.push(Agency::new(id, spec.name, spec.kind, spec.zones, categories, call_signs));
            unit_specs.push(spec.units);
        }

        // ── Units ─────────────────────────────────────────────────────────
        let mut roster = Roster::new();
        for (agency, specs) in agencies.iter_mut().zip(unit_specs) {
            for spec in specs {
                for _ in 0..spec.count {
                    let Some(sign) = agency.next_call_sign(spec.unit_type, spec.supervisor) else {
                        warn!(
                            agency = %agency.id,
                            unit_type = %spec.unit_type,
                            supervisor = spec.supervisor,
                            "call-sign pool exhausted; unit not created"
                        );
                        break;
                    };
                    let mut unit = ResponderUnit::new(
                        roster.next_id(),
                        agency.id,
                        sign,
                        spec.unit_type,
                        spec.supervisor,
                        spec.shift,
                        Controller::Ai,
                        spec.home,
                    );
                    if let Some(role) = spec.secondary {
                        unit = unit.with_secondary_role(role);
                    }
                    roster.push(unit);
                }
            }
        }

        let mut player_unit = None;
        if let Some(spec) = self.player {
            let agency = agencies
                .get_mut(spec.agency.index())
                .ok_or_else(|| SimError::Config(format!("human unit's agency {} does not exist", spec.agency)))?;
            let sign = agency
                .next_call_sign(spec.unit_type, false)
                .ok_or_else(|| SimError::Config("no call sign left for the human unit".into()))?;
            let unit = ResponderUnit::new(
                roster.next_id(),
                agency.id,
                sign,
                spec.unit_type,
                false,
                ShiftRotation::Day,
                Controller::Human,
                spec.position,
            );
            player_unit = Some(roster.push(unit));
        }

        let mut rngs = UnitRngs::new(config.seed);
        if let Some(last) = roster.iter().last() {
            rngs.ensure(last.id);
        }

        // ── Wiring ────────────────────────────────────────────────────────
        let dispatchers = agencies
            .iter()
            .map(|a| UnitDispatcher::new(a.id, a.policy(), a.jurisdiction.iter().copied()))
            .collect();
        let zones = match self.zones {
            Some(z) => z,
            None => Box::new(StaticZoneDirectory::from_agencies(&agencies)),
        };
        let (signals, inbox) = host_channel();
        let acceptance_ticks = config.make_clock().ticks_for_real(config.acceptance_timeout);

        info!(agencies = agencies.len(), units = roster.len(), acceptance_ticks, "dispatch coordinator built");

        Ok(DispatchCoordinator {
            agencies,
            dispatchers,
            board:            CallBoard::new(),
            roster,
            rngs,
            behavior:         self.behavior.unwrap_or_else(|| Box::new(DefaultBehavior::default())),
            zones,
            host:             self.host.unwrap_or_else(|| Box::new(NullHost)),
            sink:             self.sink.unwrap_or_else(|| Box::new(NullHost)),
            inbox,
            signals,
            call_ids:         IdSequence::new(),
            player:           PlayerState::new(player_unit, config.player_callout_cooldown_ticks),
            shift:            None,
            weather:          Weather::default(),
            now:              Tick::ZERO,
            acceptance_ticks,
            lifecycle:        VecDeque::new(),
            released:         Vec::new(),
            config,
        })
    }
}
