//! The `Simulation` runner: clock, incident generator, and coordinator.

use dispatch_core::{ClockSource, DispatchConfig, EventId, IdSequence, SimClock, Tick, Weather};
use dispatch_gen::{ActivityLevel, EventGenerator, GenEvent, LocationProvider};
use tracing::{debug, info};

use crate::{DispatchCoordinator, DispatchObserver, HostSignalSender, SimResult};

/// The main simulation runner.
///
/// Each tick:
///
/// 1. **Generate**: the [`EventGenerator`] rolls activity levels at period
///    changes and turns due arrivals into incidents.
/// 2. **Report**: new incidents go on the coordinator's board.
/// 3. **Coordinate**: [`DispatchCoordinator::tick`] runs shifts, the human
///    hand-off, dispatchers, and AI units.
/// 4. **Release**: locations of closed incidents go back to the provider.
/// 5. **Observe**: queued lifecycle entries reach the observer.
pub struct Simulation {
    pub config:      DispatchConfig,
    pub clock:       SimClock,
    pub coordinator: DispatchCoordinator,
    pub generator:   EventGenerator,
    pub locations:   Box<dyn LocationProvider>,
    weather:         Weather,
    event_ids:       IdSequence<EventId>,
}

impl Simulation {
    pub fn new<L: LocationProvider + 'static>(
        coordinator: DispatchCoordinator,
        generator:   EventGenerator,
        locations:   L,
    ) -> Self {
        let config = coordinator.config().clone();
        configure_threads(config.num_threads);

        Self {
            clock: config.make_clock(),
            config,
            coordinator,
            generator,
            locations: Box::new(locations),
            weather: Weather::default(),
            event_ids: IdSequence::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    #[inline]
    pub fn weather(&self) -> Weather {
        self.weather
    }

    /// Host-reported weather; affects scenario weights and travel speed.
    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
        self.coordinator.set_weather(weather);
    }

    #[inline]
    pub fn activity_level(&self) -> ActivityLevel {
        self.generator.activity_level()
    }

    pub fn signal_sender(&self) -> HostSignalSender {
        self.coordinator.signal_sender()
    }

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: DispatchObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            ticks = self.config.total_ticks,
            time_scale = self.clock.time_scale(),
            "simulation starting"
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(clock = %self.clock, open_calls = self.coordinator.board().call_count(), "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: DispatchObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Process one tick and advance the clock.
    pub fn step<O: DispatchObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let generated = self.generator.tick(
            &self.clock,
            self.weather,
            &mut self.event_ids,
            self.locations.as_mut(),
        );
        for event in generated {
            match event {
                GenEvent::LevelChanged { period, level } => {
                    self.coordinator.note_activity_level(now, period, level);
                }
                GenEvent::Created(incident) => {
                    self.coordinator.report(incident);
                }
                GenEvent::Skipped(reason) => debug!(tick = %now, ?reason, "arrival skipped"),
                GenEvent::Disabled => self.coordinator.note_generation_disabled(),
            }
        }

        self.coordinator.tick(&self.clock);

        for location in self.coordinator.take_released_locations() {
            self.locations.release(location);
        }
        self.coordinator.drain_lifecycle(observer);
        observer.on_tick_end(now, self.coordinator.board().call_count());

        self.clock.advance();
        Ok(())
    }
}

/// Size Rayon's global pool for the AI intent phase.
#[cfg(feature = "parallel")]
fn configure_threads(num_threads: Option<usize>) {
    let Some(n) = num_threads else { return };
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
        debug!(error = %e, "rayon pool already configured");
    }
}

#[cfg(not(feature = "parallel"))]
fn configure_threads(_num_threads: Option<usize>) {}
