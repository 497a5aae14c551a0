//! Agencies and the mutual-aid escalation table.

use dispatch_callsign::{CallSign, CallSignAllocator};
use dispatch_core::{AgencyId, AgencyKind, CallCategory, CategoryTable, ServiceSector, UnitType, ZoneId};

/// Which calls an agency's dispatcher may send its units to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AssignmentPolicy {
    /// Only calls inside the agency's own zones.
    Jurisdiction,
    /// Anywhere in the region.
    Statewide,
}

/// A jurisdictional organization with its own units and call-sign pool.
pub struct Agency {
    pub id:           AgencyId,
    pub name:         String,
    pub kind:         AgencyKind,
    pub jurisdiction: Vec<ZoneId>,
    /// Categories this agency will take.
    pub categories:   CategoryTable<bool>,
    call_signs:       Box<dyn CallSignAllocator>,
}

impl Agency {
    pub fn new(
        id:           AgencyId,
        name:         impl Into<String>,
        kind:         AgencyKind,
        jurisdiction: Vec<ZoneId>,
        categories:   CategoryTable<bool>,
        call_signs:   Box<dyn CallSignAllocator>,
    ) -> Self {
        Self { id, name: name.into(), kind, jurisdiction, categories, call_signs }
    }

    #[inline]
    pub fn policy(&self) -> AssignmentPolicy {
        if self.kind.is_statewide() { AssignmentPolicy::Statewide } else { AssignmentPolicy::Jurisdiction }
    }

    #[inline]
    pub fn sector(&self) -> ServiceSector {
        self.kind.sector()
    }

    /// May this agency's units work a call in `zone`?
    pub fn covers(&self, zone: ZoneId) -> bool {
        self.policy() == AssignmentPolicy::Statewide || self.jurisdiction.contains(&zone)
    }

    #[inline]
    pub fn serves(&self, category: CallCategory) -> bool {
        self.categories[category]
    }

    /// Draw a call sign for a new unit.  `None` once the pool is exhausted.
    pub fn next_call_sign(&mut self, unit_type: UnitType, supervisor: bool) -> Option<CallSign> {
        self.call_signs.next(unit_type, supervisor)
    }

    pub fn call_signs_left(&self, unit_type: UnitType, supervisor: bool) -> usize {
        self.call_signs.remaining(unit_type, supervisor)
    }
}

impl std::fmt::Debug for Agency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agency")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("jurisdiction", &self.jurisdiction)
            .finish_non_exhaustive()
    }
}

/// The agency that receives `from`'s mutual-aid request for a `category`
/// call in `zone`.
///
/// The target kind comes from [`AgencyKind::mutual_aid_target`]; among
/// agencies of that kind the first (lowest id) that covers the zone and takes
/// the category wins.
pub fn escalation_target(
    agencies: &[Agency],
    from:     AgencyId,
    zone:     ZoneId,
    category: CallCategory,
) -> Option<AgencyId> {
    let target_kind = agencies.get(from.index())?.kind.mutual_aid_target()?;
    agencies
        .iter()
        .filter(|a| a.id != from && a.kind == target_kind)
        .find(|a| a.covers(zone) && a.serves(category))
        .map(|a| a.id)
}
