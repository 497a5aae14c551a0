//! `UnitDispatcher`: matches one agency's pending calls to its units.
//!
//! A dispatcher never mutates calls or units.  `process` returns
//! [`DispatchAction`]s which the coordinator applies, so the coordinator
//! stays the single writer of board and roster state.

use dispatch_call::CallRecord;
use dispatch_core::{AgencyId, CallId, Tick, UnitId, ZoneId};
use dispatch_unit::Roster;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::{AssignmentPolicy, CallBoard};

/// What a dispatcher wants done after one `process` pass.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DispatchAction {
    /// Send `unit` to `call`.
    Assign { unit: UnitId, call: CallId },
    /// No local unit could take `call`; ask the mutual-aid partner for
    /// `need` more.
    Raise { call: CallId, need: usize },
    /// `call` sat unattended past its scenario's expiry window.
    Expire(CallId),
}

/// Read-only inputs for one `process` pass.
pub struct DispatchContext<'a> {
    pub now:              Tick,
    pub board:            &'a CallBoard,
    pub roster:           &'a Roster,
    /// The human unit may be offered a call this pass.
    pub player_ready:     bool,
    pub mutual_aid_delay: u64,
}

/// Per-agency dispatcher.
pub struct UnitDispatcher {
    agency:   AgencyId,
    policy:   AssignmentPolicy,
    zones:    FxHashSet<ZoneId>,
    /// Tick each pending call entered this dispatcher.
    pending:  FxHashMap<CallId, Tick>,
    /// Calls this dispatcher already asked mutual aid for.
    raised:   FxHashSet<CallId>,
    disposed: bool,
}

impl UnitDispatcher {
    pub fn new(agency: AgencyId, policy: AssignmentPolicy, zones: impl IntoIterator<Item = ZoneId>) -> Self {
        Self {
            agency,
            policy,
            zones:    zones.into_iter().collect(),
            pending:  FxHashMap::default(),
            raised:   FxHashSet::default(),
            disposed: false,
        }
    }

    #[inline]
    pub fn agency(&self) -> AgencyId {
        self.agency
    }

    fn check_live(&self) {
        assert!(!self.disposed, "dispatcher for {} used after dispose", self.agency);
    }

    // ── Queue ─────────────────────────────────────────────────────────────

    /// Queue `call` for assignment.  `false` if it is already queued, or if
    /// the board does not know it (logged).
    pub fn add_call(&mut self, call: CallId, board: &CallBoard, now: Tick) -> bool {
        self.check_live();
        let Some(record) = board.call(call) else {
            warn!(agency = %self.agency, call = %call, "add_call for unknown call ignored");
            return false;
        };
        if !record.is_open() || board.event(record.event).is_none() {
            warn!(agency = %self.agency, call = %call, "add_call for a closed call ignored");
            return false;
        }
        if self.pending.contains_key(&call) {
            return false;
        }
        self.pending.insert(call, now);
        true
    }

    /// Forget `call`.  Runs first in every closure cascade.
    pub fn remove_call(&mut self, call: CallId) -> bool {
        self.check_live();
        self.raised.remove(&call);
        self.pending.remove(&call).is_some()
    }

    /// Record a mutual-aid request for `call`.  `false` if one was already
    /// made.
    pub fn raise_call(&mut self, call: CallId) -> bool {
        self.check_live();
        self.raised.insert(call)
    }

    #[inline]
    pub fn contains(&self, call: CallId) -> bool {
        self.pending.contains_key(&call)
    }

    #[inline]
    pub fn is_raised(&self, call: CallId) -> bool {
        self.raised.contains(&call)
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pending call ids in ascending order.
    pub fn pending(&self) -> Vec<CallId> {
        let mut ids: Vec<CallId> = self.pending.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drop all queued work.  Any later use panics.
    pub fn dispose(&mut self) {
        self.pending.clear();
        self.raised.clear();
        self.disposed = true;
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ── Matching ──────────────────────────────────────────────────────────

    /// One matching pass over the pending calls.
    ///
    /// Calls are visited most urgent first (then oldest, then id).  Each
    /// call gets the nearest free units of this agency that can serve its
    /// sector, up to the number it still needs.  A call that gets nobody
    /// and has waited `mutual_aid_delay` ticks is raised once.
    pub fn process(&mut self, ctx: &DispatchContext<'_>) -> Vec<DispatchAction> {
        self.check_live();
        let mut actions = Vec::new();

        let mut stale = Vec::new();
        let mut calls: Vec<&CallRecord> = Vec::with_capacity(self.pending.len());
        for &id in self.pending.keys() {
            match ctx.board.call(id) {
                Some(c) if c.is_open() => calls.push(c),
                _ => stale.push(id),
            }
        }
        for id in stale {
            warn!(agency = %self.agency, call = %id, "dropping stale call reference");
            self.pending.remove(&id);
            self.raised.remove(&id);
        }
        calls.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.created.cmp(&b.created))
                .then(a.id.cmp(&b.id))
        });

        let mut taken: FxHashSet<UnitId> = FxHashSet::default();
        let mut player_ready = ctx.player_ready;

        for call in calls {
            if call.is_expired(ctx.now) {
                actions.push(DispatchAction::Expire(call.id));
                continue;
            }
            if self.policy == AssignmentPolicy::Jurisdiction && !self.zones.contains(&call.zone) {
                debug!(agency = %self.agency, call = %call.id, zone = %call.zone, "call outside jurisdiction");
                continue;
            }

            let mut need = call.required_units.saturating_sub(call.attached().len());
            if need == 0 {
                continue;
            }

            let mut candidates: Vec<(f32, UnitId, bool)> = ctx
                .roster
                .by_agency(self.agency)
                .filter(|u| u.is_available() && u.can_serve(call.sector))
                .filter(|u| !taken.contains(&u.id) && !call.is_attached(u.id))
                .filter(|u| !u.is_human() || (player_ready && !call.was_declined_by(u.id)))
                .map(|u| (call.distance_to(u.position), u.id, u.is_human()))
                .collect();
            candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let mut assigned = 0;
            for (_, unit, human) in candidates {
                if need == 0 {
                    break;
                }
                if human {
                    player_ready = false;
                }
                taken.insert(unit);
                actions.push(DispatchAction::Assign { unit, call: call.id });
                need -= 1;
                assigned += 1;
            }

            if assigned == 0 && !self.raised.contains(&call.id) {
                let waited = self.pending.get(&call.id).map_or(0, |&since| ctx.now.since(since));
                if waited >= ctx.mutual_aid_delay && self.raise_call(call.id) {
                    actions.push(DispatchAction::Raise { call: call.id, need });
                }
            }
        }

        actions
    }
}
