//! Primary/attached responder bookkeeping shared by events and calls.

use dispatch_core::UnitId;

/// The responders working a record.
///
/// Invariant: `primary` is always a member of `attached`, and is `None` iff
/// `attached` is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attachments {
    primary:  Option<UnitId>,
    attached: Vec<UnitId>,
}

impl Attachments {
    /// Attach `unit`.  It becomes primary if there is none yet or `force` is
    /// set.  Returns `true` if the unit was not attached before.
    pub fn attach(&mut self, unit: UnitId, force_primary: bool) -> bool {
        let added = !self.attached.contains(&unit);
        if added {
            self.attached.push(unit);
        }
        if force_primary || self.primary.is_none() {
            self.primary = Some(unit);
        }
        added
    }

    /// Detach `unit`, promoting the first remaining responder if `unit` was
    /// primary.  Returns `false` if it was not attached.
    pub fn detach(&mut self, unit: UnitId) -> bool {
        let Some(pos) = self.attached.iter().position(|&u| u == unit) else {
            return false;
        };
        self.attached.remove(pos);
        if self.primary == Some(unit) {
            self.primary = self.attached.first().copied();
        }
        true
    }

    #[inline]
    pub fn primary(&self) -> Option<UnitId> {
        self.primary
    }

    #[inline]
    pub fn attached(&self) -> &[UnitId] {
        &self.attached
    }

    #[inline]
    pub fn contains(&self, unit: UnitId) -> bool {
        self.attached.contains(&unit)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Release every responder, returning them in attachment order.
    pub fn clear(&mut self) -> Vec<UnitId> {
        self.primary = None;
        std::mem::take(&mut self.attached)
    }
}
