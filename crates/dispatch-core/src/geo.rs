//! World positions.
//!
//! The host world is a flat game map measured in metres, so distances are
//! plain Euclidean.  `z` is carried for the host's benefit but ignored when
//! ranking responders by distance.

/// A point in the host world, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane position (z = 0).
    #[inline]
    pub fn flat(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Squared ground-plane distance.  Use for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Ground-plane distance in metres.
    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}
