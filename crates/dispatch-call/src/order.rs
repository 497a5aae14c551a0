//! Ranking of calls competing for one responder.

use std::cmp::Ordering;

use dispatch_core::{Position, UnitId};

use crate::CallRecord;

/// Compare two calls from the point of view of `unit` standing at `from`.
///
/// Lower priority number first; on a tie, calls `unit` already declined go
/// last; then nearest first.
pub fn compare_for_unit(a: &CallRecord, b: &CallRecord, unit: UnitId, from: Position) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.was_declined_by(unit).cmp(&b.was_declined_by(unit)))
        .then_with(|| a.distance_to(from).total_cmp(&b.distance_to(from)))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort `calls` best-first for `unit`.
pub fn rank_for_unit<'a>(
    calls: impl IntoIterator<Item = &'a CallRecord>,
    unit:  UnitId,
    from:  Position,
) -> Vec<&'a CallRecord> {
    let mut ranked: Vec<&CallRecord> = calls.into_iter().collect();
    ranked.sort_by(|a, b| compare_for_unit(a, b, unit, from));
    ranked
}
