//! `CallBoard`: the single registry of open events and calls.

use dispatch_call::{CallRecord, EventRecord};
use dispatch_core::{CallId, EventId, Priority, PriorityTable};
use rustc_hash::FxHashMap;

/// Open events and their calls, with calls bucketed by priority.
///
/// Closed records are removed by the coordinator as part of the closure
/// cascade, so everything on the board is open.
#[derive(Default)]
pub struct CallBoard {
    events:   FxHashMap<EventId, EventRecord>,
    calls:    FxHashMap<CallId, CallRecord>,
    /// Call ids per priority, in insertion order.
    buckets:  PriorityTable<Vec<CallId>>,
    by_event: FxHashMap<EventId, Vec<CallId>>,
}

impl CallBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn insert_event(&mut self, event: EventRecord) {
        self.by_event.entry(event.id).or_default();
        self.events.insert(event.id, event);
    }

    #[inline]
    pub fn event(&self, event: EventId) -> Option<&EventRecord> {
        self.events.get(&event)
    }

    #[inline]
    pub fn event_mut(&mut self, event: EventId) -> Option<&mut EventRecord> {
        self.events.get_mut(&event)
    }

    #[inline]
    pub fn contains_event(&self, event: EventId) -> bool {
        self.events.contains_key(&event)
    }

    /// Calls still on the board for `event`.
    pub fn calls_of(&self, event: EventId) -> Vec<CallId> {
        self.by_event.get(&event).cloned().unwrap_or_default()
    }

    pub fn remove_event(&mut self, event: EventId) -> Option<EventRecord> {
        self.by_event.remove(&event);
        self.events.remove(&event)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    pub fn insert_call(&mut self, call: CallRecord) {
        self.buckets[call.priority].push(call.id);
        self.by_event.entry(call.event).or_default().push(call.id);
        self.calls.insert(call.id, call);
    }

    #[inline]
    pub fn call(&self, call: CallId) -> Option<&CallRecord> {
        self.calls.get(&call)
    }

    #[inline]
    pub fn call_mut(&mut self, call: CallId) -> Option<&mut CallRecord> {
        self.calls.get_mut(&call)
    }

    /// Remove a call from its bucket, its event's list, and the map.
    pub fn remove_call(&mut self, call: CallId) -> Option<CallRecord> {
        let record = self.calls.remove(&call)?;
        self.buckets[record.priority].retain(|&c| c != call);
        if let Some(list) = self.by_event.get_mut(&record.event) {
            list.retain(|&c| c != call);
        }
        Some(record)
    }

    /// Every open call by id.
    #[inline]
    pub fn calls(&self) -> &FxHashMap<CallId, CallRecord> {
        &self.calls
    }

    /// Open call ids of one priority, oldest first.
    #[inline]
    pub fn bucket(&self, priority: Priority) -> &[CallId] {
        &self.buckets[priority]
    }

    /// A copy of every bucket.
    pub fn open_calls_by_priority(&self) -> PriorityTable<Vec<CallId>> {
        self.buckets.clone()
    }

    #[inline]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.events.is_empty()
    }
}
