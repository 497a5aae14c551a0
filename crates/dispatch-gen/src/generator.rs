//! The `EventGenerator`: turns zone profiles and templates into incidents.

use std::sync::Arc;

use dispatch_call::{EventRecord, LocationFilter, ScenarioTemplate};
use dispatch_core::{
    CallCategory, EventId, IdSequence, Ordinal, PeriodTable, SimClock, SimRng, TimePeriod, Weather,
    ZoneId,
};
use tracing::{debug, error, info, warn};

use crate::{
    ActivityLevel, ArrivalQueue, GenError, GenResult, GeneratorConfig, LocationProvider, ZoneProfile,
};

/// What happened during one generator tick.
#[derive(Debug)]
pub enum GenEvent {
    /// A period started and the activity level was re-rolled.
    LevelChanged {
        period: TimePeriod,
        level:  ActivityLevel,
    },
    Created(EventRecord),
    /// A due arrival could not be turned into an event.
    Skipped(SkipReason),
    /// Too many arrivals in a row failed; generation is off for the run.
    /// Emitted exactly once.
    Disabled,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SkipReason {
    NoZone,
    NoCategory(ZoneId),
    NoTemplate(ZoneId, CallCategory),
    NoLocation(ZoneId),
}

/// Produces [`EventRecord`]s approximating the configured call rates.
///
/// # Per-period cycle
///
/// ```text
/// period change ─► roll ActivityLevel ─► sample N ─► draw N ticks in
///                  [now, period_end) ─► ArrivalQueue
/// each tick     ─► arrival due? ─► zone ─► category ─► template ─► location
/// ```
pub struct EventGenerator {
    config:    GeneratorConfig,
    zones:     Vec<ZoneProfile>,
    templates: Vec<Arc<ScenarioTemplate>>,
    /// Expected calls per period, summed over zones.
    base:      PeriodTable<f64>,
    level:     ActivityLevel,
    period:    Option<TimePeriod>,
    arrivals:  ArrivalQueue,
    failures:  u32,
    disabled:  bool,
    rng:       SimRng,
}

impl EventGenerator {
    pub fn new(
        config:    GeneratorConfig,
        zones:     Vec<ZoneProfile>,
        templates: Vec<Arc<ScenarioTemplate>>,
        rng:       SimRng,
    ) -> GenResult<Self> {
        if config.max_location_attempts == 0 {
            return Err(GenError::Config("max_location_attempts must be at least 1".into()));
        }
        if config.max_consecutive_failures == 0 {
            return Err(GenError::Config("max_consecutive_failures must be at least 1".into()));
        }
        let base = PeriodTable::from_fn(|p| zones.iter().map(|z| z.expected_calls(p)).sum());
        Ok(Self {
            config,
            zones,
            templates,
            base,
            level:    ActivityLevel::default(),
            period:   None,
            arrivals: ArrivalQueue::new(),
            failures: 0,
            disabled: false,
            rng,
        })
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn activity_level(&self) -> ActivityLevel {
        self.level
    }

    #[inline]
    pub fn pending_arrivals(&self) -> usize {
        self.arrivals.len()
    }

    pub fn arrivals(&self) -> &ArrivalQueue {
        &self.arrivals
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Base expected calls for `period` before the activity level applies.
    #[inline]
    pub fn expected_calls(&self, period: TimePeriod) -> f64 {
        self.base[period]
    }

    pub fn zones(&self) -> &[ZoneProfile] {
        &self.zones
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one scheduler tick.
    pub fn tick(
        &mut self,
        clock:     &SimClock,
        weather:   Weather,
        ids:       &mut IdSequence<EventId>,
        locations: &mut dyn LocationProvider,
    ) -> Vec<GenEvent> {
        let mut out = Vec::new();
        if self.disabled {
            return out;
        }

        let period = clock.time_period();
        if self.period != Some(period) {
            self.period = Some(period);
            self.start_period(clock, period);
            out.push(GenEvent::LevelChanged { period, level: self.level });
        }

        let now = clock.current_tick;
        if self.arrivals.pop_due(now).is_none() {
            return out;
        }

        match self.synthesize(clock, period, weather, ids, locations) {
            Ok(event) => {
                self.failures = 0;
                out.push(GenEvent::Created(event));
            }
            Err(reason) => {
                self.failures += 1;
                warn!(?reason, failures = self.failures, "skipped incident arrival");
                out.push(GenEvent::Skipped(reason));
                if self.failures >= self.config.max_consecutive_failures {
                    self.disabled = true;
                    self.arrivals = ArrivalQueue::new();
                    error!(failures = self.failures, "incident generation disabled for this run");
                    out.push(GenEvent::Disabled);
                }
            }
        }
        out
    }

    /// Re-roll the level and, if enough of the period is left, draw arrivals.
    fn start_period(&mut self, clock: &SimClock, period: TimePeriod) {
        self.level = ActivityLevel::roll(&mut self.rng);
        let now = clock.current_tick;
        let end = clock.period_end_tick();
        let min_window = clock.ticks_for_minutes(self.config.min_period_window_mins);

        if end.since(now) < min_window {
            debug!(%period, remaining = end.since(now), "period too short, arrivals not rebuilt");
            return;
        }

        let count = self.level.sample_count(self.base[period], &mut self.rng);
        self.arrivals.rebuild(now, end, count, &mut self.rng);
        info!(
            %period,
            level = %self.level,
            expected = self.base[period],
            arrivals = count,
            "activity level rolled"
        );
    }

    fn synthesize(
        &mut self,
        clock:     &SimClock,
        period:    TimePeriod,
        weather:   Weather,
        ids:       &mut IdSequence<EventId>,
        locations: &mut dyn LocationProvider,
    ) -> Result<EventRecord, SkipReason> {
        let mut filter = LocationFilter::any();
        let mut last = SkipReason::NoZone;
        for _ in 0..self.config.max_location_attempts {
            // Every attempt re-draws zone, category and template.
            let zone = self
                .rng
                .choose_weighted(&self.zones, |z| z.expected_calls(period))
                .ok_or(SkipReason::NoZone)?;
            let zone_id = zone.zone;

            let Some(category) = self.rng.weighted_index(&zone.category_weights.0).map(|i| CallCategory::ALL[i])
            else {
                last = SkipReason::NoCategory(zone_id);
                continue;
            };

            let candidates: Vec<&Arc<ScenarioTemplate>> =
                self.templates.iter().filter(|t| t.category == category).collect();
            let Some(template) = self
                .rng
                .choose_weighted(&candidates, |t| t.weight(period, weather))
                .map(|t| Arc::clone(*t))
            else {
                last = SkipReason::NoTemplate(zone_id, category);
                continue;
            };

            let Some(location) =
                locations.random_location(zone_id, template.location_kind, &filter, self.config.exclude_in_use)
            else {
                last = SkipReason::NoLocation(zone_id);
                continue;
            };
            if location.zone != zone_id || location.kind != template.location_kind {
                warn!(location = %location.id, "provider returned a location outside the request");
                filter.exclude.push(location.id);
                last = SkipReason::NoLocation(zone_id);
                continue;
            }
            locations.claim(location.id);
            let event = EventRecord::new(ids.next_id(), template, location, clock.current_tick);
            debug!(event = %event.id, scenario = %event.scenario.name, zone = %zone_id, "incident created");
            return Ok(event);
        }
        Err(last)
    }
}
