//! The `UnitBehavior` trait and the default AI responder.

use std::ops::RangeInclusive;

use dispatch_call::CallRecord;
use dispatch_core::{CallId, Position, ResponseCode, Tick, UnitId, UnitRng, Weather};
use rustc_hash::FxHashMap;

use crate::{OutOfServiceReason, ResponderUnit, Roster, UnitIntent, UnitRngs, UnitStatus};

// ── Context ───────────────────────────────────────────────────────────────────

/// Read-only state shared by every behavior callback in one tick.
pub struct UnitContext<'a> {
    pub tick:               Tick,
    pub tick_duration_secs: u32,
    pub weather:            Weather,
    pub roster:             &'a Roster,
    /// Open calls by id.
    pub calls:              &'a FxHashMap<CallId, CallRecord>,
}

impl UnitContext<'_> {
    /// Ticks covering `secs` simulated seconds, at least one.
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        let per_tick = self.tick_duration_secs.max(1) as f64;
        ((secs / per_tick).ceil() as u64).max(1)
    }
}

// ── UnitBehavior ──────────────────────────────────────────────────────────────

/// Pluggable AI unit behavior.
///
/// The coordinator may call `update` for many units in parallel (with the
/// `parallel` feature), so implementations must be `Send + Sync` and keep
/// per-unit state in the [`ResponderUnit`] itself.
pub trait UnitBehavior: Send + Sync + 'static {
    /// Called once per tick for every active AI unit.  An empty `Vec` means
    /// "carry on".
    fn update(&self, unit: &ResponderUnit, ctx: &UnitContext<'_>, rng: &mut UnitRng) -> Vec<UnitIntent>;
}

/// A behavior that never does anything.  Units only move when the
/// coordinator moves them.
pub struct IdleBehavior;

impl UnitBehavior for IdleBehavior {
    fn update(&self, _unit: &ResponderUnit, _ctx: &UnitContext<'_>, _rng: &mut UnitRng) -> Vec<UnitIntent> {
        vec![]
    }
}

// ── DefaultBehavior ───────────────────────────────────────────────────────────

/// Drive, work the scene, clear, and take the occasional break.
#[derive(Clone, Debug)]
pub struct DefaultBehavior {
    /// Road speed under normal traffic rules, m/s.
    pub code2_speed:       f64,
    /// Road speed with lights and siren, m/s.
    pub code3_speed:       f64,
    /// Speed multiplier in rain, thunder or snow.
    pub wet_factor:        f64,
    /// Per-tick chance an idle unit goes out of service.
    pub break_chance:      f64,
    pub break_minutes:     RangeInclusive<u32>,
}

impl Default for DefaultBehavior {
    fn default() -> Self {
        Self {
            code2_speed:   14.0,
            code3_speed:   24.0,
            wet_factor:    0.75,
            break_chance:  0.002,
            break_minutes: 15..=45,
        }
    }
}

impl DefaultBehavior {
    /// Ticks to drive from `from` to `to`.
    pub fn travel_ticks(&self, from: Position, to: Position, code: ResponseCode, ctx: &UnitContext<'_>) -> u64 {
        let mut speed = if code.is_expedited() { self.code3_speed } else { self.code2_speed };
        if ctx.weather.is_wet() {
            speed *= self.wet_factor;
        }
        let secs = from.distance(to) as f64 / speed.max(0.1);
        ctx.ticks_for_secs(secs)
    }

    fn on_scene_ticks(&self, call: &CallRecord, ctx: &UnitContext<'_>, rng: &mut UnitRng) -> u64 {
        let minutes = call.scenario.on_scene_minutes.clone();
        let minutes = if minutes.is_empty() { *minutes.start() } else { rng.gen_range(minutes) };
        ctx.ticks_for_secs(minutes as f64 * 60.0)
    }

    fn pick_break(&self, ctx: &UnitContext<'_>, rng: &mut UnitRng) -> UnitIntent {
        let reason = match rng.gen_range(0..10u32) {
            0..=4 => OutOfServiceReason::Meal,
            5..=8 => OutOfServiceReason::Reports,
            _     => OutOfServiceReason::Vehicle,
        };
        let range = self.break_minutes.clone();
        let minutes = if range.is_empty() { *range.start() } else { rng.gen_range(range) };
        UnitIntent::GoOutOfService {
            reason,
            until: ctx.tick + ctx.ticks_for_secs(minutes as f64 * 60.0),
        }
    }
}

impl UnitBehavior for DefaultBehavior {
    fn update(&self, unit: &ResponderUnit, ctx: &UnitContext<'_>, rng: &mut UnitRng) -> Vec<UnitIntent> {
        let now = ctx.tick;
        match unit.status() {
            UnitStatus::Dispatched => {
                let Some(call) = unit.current_call().and_then(|c| ctx.calls.get(&c)) else {
                    return vec![];
                };
                match unit.timers.arrive_at {
                    None => vec![UnitIntent::Respond {
                        call:      call.id,
                        arrive_at: now + self.travel_ticks(unit.position, call.position, call.response, ctx),
                    }],
                    Some(t) if now >= t => vec![UnitIntent::ArriveOnScene {
                        call:     call.id,
                        clear_at: now + self.on_scene_ticks(call, ctx, rng),
                    }],
                    Some(_) => vec![],
                }
            }
            UnitStatus::OnScene => match (unit.current_call(), unit.timers.clear_at) {
                (Some(call), Some(t)) if now >= t => {
                    if unit.is_primary_on_call() {
                        vec![UnitIntent::ClearCall { call }]
                    } else {
                        vec![UnitIntent::LeaveScene { call }]
                    }
                }
                _ => vec![],
            },
            UnitStatus::OutOfService => match unit.timers.in_service {
                Some(t) if now >= t => vec![UnitIntent::ReturnToService],
                _ => vec![],
            },
            UnitStatus::Available => {
                if unit.is_available() && !unit.relieved && rng.gen_bool(self.break_chance) {
                    vec![self.pick_break(ctx, rng)]
                } else {
                    vec![]
                }
            }
        }
    }
}

// ── Intent phase ──────────────────────────────────────────────────────────────

/// Units that get an `update` call this tick: AI-controlled, and either on
/// duty or still busy with something.
#[inline]
fn is_active(unit: &ResponderUnit) -> bool {
    !unit.is_human() && (unit.on_duty || unit.status() != UnitStatus::Available)
}

/// Run `behavior` for every active AI unit.
///
/// Returns intents in ascending `UnitId` order; units with nothing to do are
/// omitted.  With the `parallel` feature the calls run on Rayon's pool; each
/// unit only touches its own RNG, so the result is identical either way.
pub fn plan_units<B: UnitBehavior + ?Sized>(
    behavior: &B,
    ctx:      &UnitContext<'_>,
    rngs:     &mut UnitRngs,
) -> Vec<(UnitId, Vec<UnitIntent>)> {
    if let Some(last) = ctx.roster.iter().last() {
        rngs.ensure(last.id);
    }
    let units = ctx.roster.as_slice();

    #[cfg(not(feature = "parallel"))]
    {
        units
            .iter()
            .zip(rngs.inner.iter_mut())
            .filter(|(unit, _)| is_active(unit))
            .map(|(unit, rng)| (unit.id, behavior.update(unit, ctx, rng)))
            .filter(|(_, intents)| !intents.is_empty())
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        units
            .par_iter()
            .zip(rngs.inner.par_iter_mut())
            .filter(|(unit, _)| is_active(unit))
            .map(|(unit, rng)| (unit.id, behavior.update(unit, ctx, rng)))
            .filter(|(_, intents)| !intents.is_empty())
            .collect()
    }
}
