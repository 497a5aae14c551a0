//! Shared classification enums: sectors, priorities, categories, unit types,
//! and agency kinds.

use crate::table::Ordinal;

// ── ServiceSector ─────────────────────────────────────────────────────────────

/// The responding discipline for an incident.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceSector {
    Police,
    Fire,
    Medical,
}

impl ServiceSector {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceSector::Police  => "police",
            ServiceSector::Fire    => "fire",
            ServiceSector::Medical => "medical",
        }
    }
}

impl Ordinal for ServiceSector {
    const ALL: &'static [Self] = &[
        ServiceSector::Police,
        ServiceSector::Fire,
        ServiceSector::Medical,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ServiceSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── Priority ──────────────────────────────────────────────────────────────────

/// Call urgency.  A smaller number is more urgent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// 1: life-threatening, in progress.
    Immediate = 1,
    /// 2: emergency.
    Emergency = 2,
    /// 3: expedited.
    Expedited = 3,
    /// 4: routine, report-only.
    Routine = 4,
}

impl Priority {
    /// The numeric priority (1–4).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse a numeric priority.
    pub fn from_number(n: u8) -> Option<Priority> {
        match n {
            1 => Some(Priority::Immediate),
            2 => Some(Priority::Emergency),
            3 => Some(Priority::Expedited),
            4 => Some(Priority::Routine),
            _ => None,
        }
    }

    /// `true` if `self` is strictly more urgent than `other`.
    #[inline]
    pub fn outranks(self, other: Priority) -> bool {
        self.number() < other.number()
    }
}

impl Ordinal for Priority {
    const ALL: &'static [Self] = &[
        Priority::Immediate,
        Priority::Emergency,
        Priority::Expedited,
        Priority::Routine,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self.number() as usize - 1
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.number())
    }
}

// ── ResponseCode ──────────────────────────────────────────────────────────────

/// How a unit drives to the call.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponseCode {
    /// Normal traffic rules.
    #[default]
    Code2,
    /// Lights and siren.
    Code3,
}

impl ResponseCode {
    #[inline]
    pub fn is_expedited(self) -> bool {
        matches!(self, ResponseCode::Code3)
    }
}

// ── CallCategory ──────────────────────────────────────────────────────────────

/// Broad incident category used by zone crime profiles and agency capability.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallCategory {
    Traffic,
    Property,
    Violent,
    Disturbance,
    Assistance,
    Emergency,
}

impl CallCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CallCategory::Traffic     => "traffic",
            CallCategory::Property    => "property",
            CallCategory::Violent     => "violent",
            CallCategory::Disturbance => "disturbance",
            CallCategory::Assistance  => "assistance",
            CallCategory::Emergency   => "emergency",
        }
    }
}

impl Ordinal for CallCategory {
    const ALL: &'static [Self] = &[
        CallCategory::Traffic,
        CallCategory::Property,
        CallCategory::Violent,
        CallCategory::Disturbance,
        CallCategory::Assistance,
        CallCategory::Emergency,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for CallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── UnitType ──────────────────────────────────────────────────────────────────

/// The role a responder unit fills.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitType {
    Patrol,
    Traffic,
    Canine,
    Detective,
    Engine,
    Ambulance,
}

impl UnitType {
    /// The sector this unit type serves.
    pub fn sector(self) -> ServiceSector {
        match self {
            UnitType::Engine    => ServiceSector::Fire,
            UnitType::Ambulance => ServiceSector::Medical,
            _                   => ServiceSector::Police,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Patrol    => "patrol",
            UnitType::Traffic   => "traffic",
            UnitType::Canine    => "canine",
            UnitType::Detective => "detective",
            UnitType::Engine    => "engine",
            UnitType::Ambulance => "ambulance",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── AgencyKind ────────────────────────────────────────────────────────────────

/// The type of a jurisdictional organization.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgencyKind {
    CityPolice,
    CountySheriff,
    StatePatrol,
    HighwayPatrol,
    StateParks,
    FireDepartment,
    Ems,
}

impl AgencyKind {
    /// Which kind of agency receives this agency's mutual-aid requests.
    ///
    /// city → county → state; county/state-park → state; highway/state →
    /// county.  Fire and EMS have no escalation partner.
    pub fn mutual_aid_target(self) -> Option<AgencyKind> {
        match self {
            AgencyKind::CityPolice     => Some(AgencyKind::CountySheriff),
            AgencyKind::CountySheriff  => Some(AgencyKind::StatePatrol),
            AgencyKind::StateParks     => Some(AgencyKind::StatePatrol),
            AgencyKind::HighwayPatrol  => Some(AgencyKind::CountySheriff),
            AgencyKind::StatePatrol    => Some(AgencyKind::CountySheriff),
            AgencyKind::FireDepartment => None,
            AgencyKind::Ems            => None,
        }
    }

    /// State-level agencies may send units anywhere in the region.
    pub fn is_statewide(self) -> bool {
        matches!(self, AgencyKind::StatePatrol | AgencyKind::HighwayPatrol)
    }

    /// The sector an agency of this kind serves.
    pub fn sector(self) -> ServiceSector {
        match self {
            AgencyKind::FireDepartment => ServiceSector::Fire,
            AgencyKind::Ems            => ServiceSector::Medical,
            _                          => ServiceSector::Police,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgencyKind::CityPolice     => "city police",
            AgencyKind::CountySheriff  => "county sheriff",
            AgencyKind::StatePatrol    => "state patrol",
            AgencyKind::HighwayPatrol  => "highway patrol",
            AgencyKind::StateParks     => "state parks",
            AgencyKind::FireDepartment => "fire department",
            AgencyKind::Ems            => "ems",
        }
    }
}

impl std::fmt::Display for AgencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
