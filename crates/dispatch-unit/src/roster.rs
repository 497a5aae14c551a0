//! Unit storage: `Roster` (unit state) and `UnitRngs` (per-unit RNG).
//!
//! RNGs live outside the roster so the AI intent phase can hold `&Roster`
//! and `&mut UnitRngs` at the same time.

use dispatch_core::{AgencyId, UnitId, UnitRng};

use crate::{Controller, ResponderUnit};

// ── UnitRngs ──────────────────────────────────────────────────────────────────

/// Per-unit deterministic RNG state, indexed by `UnitId`.
pub struct UnitRngs {
    pub inner: Vec<UnitRng>,
    seed:      u64,
}

impl UnitRngs {
    pub fn new(seed: u64) -> Self {
        Self { inner: Vec::new(), seed }
    }

    /// Seed RNGs up to and including `unit`.
    pub fn ensure(&mut self, unit: UnitId) {
        while self.inner.len() <= unit.index() {
            let next = UnitId(self.inner.len() as u32);
            self.inner.push(UnitRng::new(self.seed, next));
        }
    }

    #[inline]
    pub fn get_mut(&mut self, unit: UnitId) -> &mut UnitRng {
        &mut self.inner[unit.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// Every unit in the region.  `UnitId` is the index.
///
/// Units are created once and never removed; a unit leaving the roster is
/// modelled as going off duty, so its call sign stays retired.
#[derive(Default)]
pub struct Roster {
    units: Vec<ResponderUnit>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next pushed unit will receive.
    #[inline]
    pub fn next_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }

    /// Append a unit.  Its `id` is overwritten with its roster index.
    pub fn push(&mut self, mut unit: ResponderUnit) -> UnitId {
        let id = self.next_id();
        unit.id = id;
        self.units.push(unit);
        id
    }

    #[inline]
    pub fn get(&self, unit: UnitId) -> Option<&ResponderUnit> {
        self.units.get(unit.index())
    }

    #[inline]
    pub fn get_mut(&mut self, unit: UnitId) -> Option<&mut ResponderUnit> {
        self.units.get_mut(unit.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResponderUnit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ResponderUnit> {
        self.units.iter_mut()
    }

    pub fn by_agency(&self, agency: AgencyId) -> impl Iterator<Item = &ResponderUnit> + '_ {
        self.units.iter().filter(move |u| u.agency == agency)
    }

    /// The human-controlled unit, if one has been added.
    pub fn human(&self) -> Option<&ResponderUnit> {
        self.units.iter().find(|u| u.controller == Controller::Human)
    }

    pub fn as_slice(&self) -> &[ResponderUnit] {
        &self.units
    }
}
