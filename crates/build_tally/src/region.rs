//! The tracked region: one world, an axis-aligned box with exclusive edges.

use crate::config::AreaConfig;
use tally_events::Location;

/// Axis-aligned bounding box over block coordinates, scoped to one world.
///
/// Membership is exclusive on all six faces: a block exactly on `min_x` or
/// `max_x` (or any other bound) is outside. This matches the behavior the
/// plugin has always had, so existing area configs keep their meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    world: String,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    min_z: i32,
    max_z: i32,
}

impl Region {
    pub fn from_config(area: &AreaConfig) -> Self {
        Self {
            world: area.world.clone(),
            min_x: area.min_x,
            max_x: area.max_x,
            min_y: area.min_y,
            max_y: area.max_y,
            min_z: area.min_z,
            max_z: area.max_z,
        }
    }

    /// World this region lives in.
    pub fn world(&self) -> &str {
        &self.world
    }

    /// True iff `location` lies strictly inside the box in the right world.
    pub fn contains(&self, location: &Location) -> bool {
        location.world == self.world
            && location.position.block_x() > self.min_x
            && location.position.block_x() < self.max_x
            && location.position.block_y() > self.min_y
            && location.position.block_y() < self.max_y
            && location.position.block_z() > self.min_z
            && location.position.block_z() < self.max_z
    }

    /// `"minX/minY/minZ to maxX/maxY/maxZ"`, for startup logging.
    pub fn describe_bounds(&self) -> String {
        format!(
            "{}/{}/{} to {}/{}/{}",
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z
        )
    }
}
