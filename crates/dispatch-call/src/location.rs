//! Places where incidents happen.

use dispatch_core::{LocationId, Position, ZoneId};

/// What sort of place a scenario needs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    Street,
    Residence,
    Commercial,
    Highway,
    Park,
}

impl LocationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Street     => "street",
            LocationKind::Residence  => "residence",
            LocationKind::Commercial => "commercial",
            LocationKind::Highway    => "highway",
            LocationKind::Park       => "park",
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A pre-authored spawn point inside one zone.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub id:       LocationId,
    pub zone:     ZoneId,
    pub position: Position,
    pub kind:     LocationKind,
    /// Street address or landmark read out with the call.
    pub label:    String,
}

impl Location {
    pub fn new(
        id:       LocationId,
        zone:     ZoneId,
        position: Position,
        kind:     LocationKind,
        label:    impl Into<String>,
    ) -> Self {
        Self { id, zone, position, kind, label: label.into() }
    }
}

/// Extra constraints a location request must satisfy.
///
/// The generator grows `exclude` with every location it has already rejected
/// so a retry always draws a fresh pick.
#[derive(Clone, Debug, Default)]
pub struct LocationFilter {
    pub exclude:     Vec<LocationId>,
    /// Reject locations closer than `radius` metres to `position`.
    pub keep_away:   Option<(Position, f32)>,
}

impl LocationFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, location: &Location) -> bool {
        if self.exclude.contains(&location.id) {
            return false;
        }
        match self.keep_away {
            Some((centre, radius)) => location.position.distance(centre) >= radius,
            None => true,
        }
    }
}
