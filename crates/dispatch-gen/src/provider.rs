//! `LocationProvider`: where the host supplies incident locations from.

use dispatch_call::{Location, LocationFilter, LocationKind};
use dispatch_core::{LocationId, SimRng, ZoneId};
use rustc_hash::FxHashSet;

/// Source of pre-authored incident locations.
///
/// The host world owns the real location set; the engine only asks for one
/// at a time.
pub trait LocationProvider {
    /// A random location of `kind` in `zone` passing `filter`.  With
    /// `exclude_in_use`, locations already hosting an open incident are
    /// skipped.  `None` if nothing qualifies.
    fn random_location(
        &mut self,
        zone:           ZoneId,
        kind:           LocationKind,
        filter:         &LocationFilter,
        exclude_in_use: bool,
    ) -> Option<Location>;

    /// Mark `location` as hosting an open incident.
    fn claim(&mut self, _location: LocationId) {}

    /// The incident at `location` is over.
    fn release(&mut self, _location: LocationId) {}
}

/// An in-memory location list with its own RNG.
pub struct StaticLocations {
    locations: Vec<Location>,
    in_use:    FxHashSet<LocationId>,
    rng:       SimRng,
}

impl StaticLocations {
    pub fn new(locations: Vec<Location>, rng: SimRng) -> Self {
        Self { locations, in_use: FxHashSet::default(), rng }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn is_in_use(&self, location: LocationId) -> bool {
        self.in_use.contains(&location)
    }
}

impl LocationProvider for StaticLocations {
    fn random_location(
        &mut self,
        zone:           ZoneId,
        kind:           LocationKind,
        filter:         &LocationFilter,
        exclude_in_use: bool,
    ) -> Option<Location> {
        let candidates: Vec<&Location> = self
            .locations
            .iter()
            .filter(|l| l.zone == zone && l.kind == kind && filter.matches(l))
            .filter(|l| !exclude_in_use || !self.in_use.contains(&l.id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..candidates.len());
        Some(candidates[pick].clone())
    }

    fn claim(&mut self, location: LocationId) {
        self.in_use.insert(location);
    }

    fn release(&mut self, location: LocationId) {
        self.in_use.remove(&location);
    }
}
