//! Scenario templates and per-sector dispatch directives.

use std::ops::RangeInclusive;

use dispatch_core::{
    CallCategory, PeriodTable, Priority, ResponseCode, ScenarioId, SectorTable, ServiceSector,
    TimePeriod, Weather,
};

use crate::LocationKind;

/// How one service sector must respond to a scenario.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchDirective {
    pub required_units: usize,
    pub priority:       Priority,
    pub response:       ResponseCode,
}

impl DispatchDirective {
    pub fn new(required_units: usize, priority: Priority, response: ResponseCode) -> Self {
        Self { required_units, priority, response }
    }
}

/// A kind of incident the generator can produce.
///
/// Templates are supplied already parsed and shared between every event
/// created from them.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioTemplate {
    pub id:                  ScenarioId,
    pub name:                String,
    pub category:            CallCategory,
    pub location_kind:       LocationKind,
    /// Relative selection weight per time period.  Zero disables the period.
    pub period_weights:      PeriodTable<f64>,
    /// Weather the scenario is restricted to.  Empty means any weather.
    pub weather:             Vec<Weather>,
    /// Which sectors respond, and how.
    pub directives:          SectorTable<Option<DispatchDirective>>,
    /// The human-controlled unit must explicitly accept the callout.
    pub requires_acceptance: bool,
    pub emergency:           bool,
    /// Simulated minutes a unit spends on scene.
    pub on_scene_minutes:    RangeInclusive<u32>,
    /// Ticks an unattended call may wait before it expires.  `None` never
    /// expires.
    pub expiry_ticks:        Option<u64>,
    pub description:         String,
}

impl ScenarioTemplate {
    /// A template with uniform period weights, no directives, no weather
    /// restriction, and a 10–30 minute on-scene window.
    pub fn new(
        id:            ScenarioId,
        name:          impl Into<String>,
        category:      CallCategory,
        location_kind: LocationKind,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            description: name.clone(),
            name,
            category,
            location_kind,
            period_weights:      PeriodTable([1.0; 4]),
            weather:             Vec::new(),
            directives:          SectorTable([None; 3]),
            requires_acceptance: false,
            emergency:           false,
            on_scene_minutes:    10..=30,
            expiry_ticks:        None,
        }
    }

    pub fn with_directive(mut self, sector: ServiceSector, directive: DispatchDirective) -> Self {
        self.directives[sector] = Some(directive);
        self
    }

    pub fn with_period_weights(mut self, weights: PeriodTable<f64>) -> Self {
        self.period_weights = weights;
        self
    }

    pub fn with_weather(mut self, weather: impl IntoIterator<Item = Weather>) -> Self {
        self.weather = weather.into_iter().collect();
        self
    }

    pub fn with_acceptance(mut self, required: bool) -> Self {
        self.requires_acceptance = required;
        self
    }

    pub fn with_emergency(mut self, emergency: bool) -> Self {
        self.emergency = emergency;
        self
    }

    pub fn with_on_scene_minutes(mut self, minutes: RangeInclusive<u32>) -> Self {
        self.on_scene_minutes = minutes;
        self
    }

    pub fn with_expiry(mut self, ticks: u64) -> Self {
        self.expiry_ticks = Some(ticks);
        self
    }

    #[inline]
    pub fn directive(&self, sector: ServiceSector) -> Option<&DispatchDirective> {
        self.directives[sector].as_ref()
    }

    /// Every sector that responds to this scenario, in sector order.
    pub fn sectors(&self) -> impl Iterator<Item = (ServiceSector, &DispatchDirective)> + '_ {
        self.directives.iter().filter_map(|(s, d)| d.as_ref().map(|d| (s, d)))
    }

    /// Whether the scenario may be generated under `weather`.
    pub fn allows_weather(&self, weather: Weather) -> bool {
        self.weather.is_empty() || self.weather.contains(&weather)
    }

    /// Selection weight for `period` under `weather`; zero when ineligible.
    pub fn weight(&self, period: TimePeriod, weather: Weather) -> f64 {
        if self.allows_weather(weather) { self.period_weights[period].max(0.0) } else { 0.0 }
    }

    /// The most urgent priority across all directives.
    pub fn top_priority(&self) -> Option<Priority> {
        self.sectors().map(|(_, d)| d.priority).min()
    }

    /// Total responders across every sector.
    pub fn total_required_units(&self) -> usize {
        self.sectors().map(|(_, d)| d.required_units).sum()
    }
}
