//! The dispatch lifecycle stream and its observer trait.

use dispatch_call::CloseFlag;
use dispatch_core::{AgencyId, CallId, EventId, Priority, ShiftRotation, Tick, TimePeriod};
use dispatch_gen::ActivityLevel;

/// One entry of the coordinator's ordered lifecycle queue.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    ShiftStarted(ShiftRotation),
    ShiftEnded(ShiftRotation),
    CallAdded {
        call:     CallId,
        event:    EventId,
        agency:   AgencyId,
        priority: Priority,
    },
    /// Closed for any reason other than expiry.
    CallCompleted { call: CallId, flag: CloseFlag },
    CallExpired(CallId),
    CallRaised {
        call: CallId,
        from: AgencyId,
        to:   AgencyId,
    },
    ActivityLevelChanged {
        period: TimePeriod,
        level:  ActivityLevel,
    },
}

impl Lifecycle {
    /// Route this entry to the matching observer hook.
    pub fn deliver<O: DispatchObserver + ?Sized>(self, tick: Tick, observer: &mut O) {
        match self {
            Lifecycle::ShiftStarted(shift) => observer.on_shift_start(tick, shift),
            Lifecycle::ShiftEnded(shift) => observer.on_shift_end(tick, shift),
            Lifecycle::CallAdded { call, event, agency, priority } => {
                observer.on_call_added(tick, call, event, agency, priority)
            }
            Lifecycle::CallCompleted { call, flag } => observer.on_call_completed(tick, call, flag),
            Lifecycle::CallExpired(call) => observer.on_call_expired(tick, call),
            Lifecycle::CallRaised { call, from, to } => observer.on_call_raised(tick, call, from, to),
            Lifecycle::ActivityLevelChanged { period, level } => {
                observer.on_activity_level_changed(tick, period, level)
            }
        }
    }
}

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Lifecycle hooks fire in the order the
/// coordinator recorded them, after the tick's work is done and before
/// `on_tick_end`.
///
/// # Example: counting closures
///
/// ```rust,ignore
/// struct Closures(usize);
///
/// impl DispatchObserver for Closures {
///     fn on_call_completed(&mut self, _tick: Tick, _call: CallId, _flag: CloseFlag) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// `open_calls` is the number of calls on the board after the tick.
    fn on_tick_end(&mut self, _tick: Tick, _open_calls: usize) {}

    fn on_shift_start(&mut self, _tick: Tick, _shift: ShiftRotation) {}

    fn on_shift_end(&mut self, _tick: Tick, _shift: ShiftRotation) {}

    fn on_call_added(
        &mut self,
        _tick:     Tick,
        _call:     CallId,
        _event:    EventId,
        _agency:   AgencyId,
        _priority: Priority,
    ) {}

    fn on_call_completed(&mut self, _tick: Tick, _call: CallId, _flag: CloseFlag) {}

    fn on_call_expired(&mut self, _tick: Tick, _call: CallId) {}

    fn on_call_raised(&mut self, _tick: Tick, _call: CallId, _from: AgencyId, _to: AgencyId) {}

    fn on_activity_level_changed(&mut self, _tick: Tick, _period: TimePeriod, _level: ActivityLevel) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`DispatchObserver`] that does nothing.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
