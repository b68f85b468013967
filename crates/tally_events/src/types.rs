//! Shared world types: player identity, positions, and world-scoped locations.
//!
//! Wrapper types keep identifiers from being mixed up and give events a
//! stable serialized form. Positions carry double-precision coordinates the
//! way the server reports them; block-grid comparisons go through the
//! flooring accessors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player.
///
/// A UUID newtype so player identities cannot be confused with other IDs.
/// Note that the tally itself is keyed by display name, not by this ID; the
/// ID identifies a *connection-level* entity (viewer), while display names
/// key the persisted counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 3D position within a world, double precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The block-grid X coordinate (floor of the exact position).
    pub fn block_x(&self) -> i32 {
        self.x.floor() as i32
    }

    /// The block-grid Y coordinate.
    pub fn block_y(&self) -> i32 {
        self.y.floor() as i32
    }

    /// The block-grid Z coordinate.
    pub fn block_z(&self) -> i32 {
        self.z.floor() as i32
    }
}

/// A position qualified by the world it lies in.
///
/// Worlds are identified by name; two locations in different worlds never
/// compare as spatially related.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub position: Position,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            position: Position::new(x, y, z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_coordinates_floor_toward_negative_infinity() {
        let pos = Position::new(-0.5, 2.9, -3.0);
        assert_eq!(pos.block_x(), -1);
        assert_eq!(pos.block_y(), 2);
        assert_eq!(pos.block_z(), -3);
    }

    #[test]
    fn player_id_round_trips_through_display() {
        let id = PlayerId::new();
        let parsed: PlayerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
