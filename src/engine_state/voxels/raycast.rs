//! # Raycast Module
//!
//! Block targeting and block edits.
//!
//! A ray is marched in fixed steps from the viewer. Each sample is mapped to
//! the block whose centered cube contains it, then to the chunk and local
//! coordinate of that block. The walk stops at the first solid block and
//! reports it together with the last empty block seen just before it.

use cgmath::{InnerSpace, Point3, Vector3};
use log::{debug, warn};

use super::{block::block_type::BlockType, chunk::ChunkDimensions, world::World};

/// A block addressed by its chunk and its coordinate inside that chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    /// Chunk coordinate (y is always 0).
    pub chunk: Point3<i32>,
    /// Local coordinate inside the chunk.
    pub local: Point3<i32>,
}

impl BlockLocation {
    /// Splits a world block coordinate into chunk and local parts.
    pub fn from_world(block: Point3<i32>, dimensions: &ChunkDimensions) -> Self {
        let size_x = dimensions.size_x as i32;
        let size_z = dimensions.size_z as i32;
        BlockLocation {
            chunk: Point3::new(block.x.div_euclid(size_x), 0, block.z.div_euclid(size_z)),
            local: Point3::new(block.x.rem_euclid(size_x), block.y, block.z.rem_euclid(size_z)),
        }
    }

    /// World block coordinate of this location.
    pub fn world_position(&self, dimensions: &ChunkDimensions) -> Point3<i32> {
        Point3::new(
            self.chunk.x * dimensions.size_x as i32 + self.local.x,
            self.local.y,
            self.chunk.z * dimensions.size_z as i32 + self.local.z,
        )
    }
}

/// Result of a ray that reached a solid block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RaycastHit {
    /// The first solid block along the ray. Breaking clears this cell.
    pub solid: BlockLocation,
    /// The empty cell sampled just before `solid`. Placing writes this cell.
    ///
    /// `None` when the ray started inside the block, or when the cell before
    /// it was outside the world or in an unloaded chunk.
    pub empty: Option<BlockLocation>,
}

/// A block edit resolved against a raycast hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Write the block into the hit's empty cell.
    Place(BlockType),
    /// Clear the hit's solid cell.
    Break,
}

/// World block whose centered cube contains `point`.
pub fn block_at_point(point: Point3<f32>, block_render_size: f32) -> Point3<i32> {
    Point3::new(
        (point.x + block_render_size).floor() as i32,
        (point.y + block_render_size).floor() as i32,
        (point.z + block_render_size).floor() as i32,
    )
}

impl World {
    /// Marches a ray through the resident chunks.
    ///
    /// # Arguments
    /// * `origin` - World-space start of the ray
    /// * `direction` - Direction of the ray; need not be normalized
    /// * `max_distance` - How far to march, in world units
    ///
    /// # Returns
    /// The first solid block hit, or `None` if the ray runs out of reach,
    /// has no direction or an unbounded reach, or only crosses unloaded or
    /// out-of-world cells.
    pub fn cast_ray(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let length = direction.magnitude();
        if !(length > 0.0) || !length.is_finite() {
            return None;
        }
        if !(max_distance > 0.0) || !max_distance.is_finite() {
            return None;
        }
        let step = self.config().ray_step;
        if !(step > 0.0) || !step.is_finite() {
            return None;
        }
        let direction = direction / length;
        let half = self.config().block_render_size;
        let dimensions = self.dimensions();

        let samples = (max_distance / step).floor() as u32;
        let mut last_empty: Option<BlockLocation> = None;

        for i in 1..=samples {
            let point = origin + direction * (i as f32 * step);
            let location =
                BlockLocation::from_world(block_at_point(point, half), &dimensions);

            if location.local.y < 0 || location.local.y >= dimensions.height as i32 {
                last_empty = None;
                continue;
            }
            let Some(chunk) = self.chunk(location.chunk) else {
                last_empty = None;
                continue;
            };
            let block = chunk
                .get_block(location.local.x, location.local.y, location.local.z)
                .unwrap_or(BlockType::AIR);

            if block.is_solid() {
                return Some(RaycastHit {
                    solid: location,
                    empty: last_empty,
                });
            }
            last_empty = Some(location);
        }

        None
    }

    /// Casts a ray with the configured reach.
    pub fn cast_view_ray(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RaycastHit> {
        self.cast_ray(origin, direction, self.config().max_reach)
    }

    /// The block at a location, if its chunk is resident and the local
    /// coordinate is inside it.
    pub fn block_at(&self, location: BlockLocation) -> Option<BlockType> {
        self.chunk(location.chunk)?
            .get_block(location.local.x, location.local.y, location.local.z)
    }

    /// Writes one block and remeshes what it affects.
    ///
    /// With `place_mode` the cell receives `block`; otherwise it is cleared
    /// to air. The edited chunk is remeshed immediately, as is every meshed
    /// neighbour sharing the edited cell's border.
    ///
    /// # Returns
    /// `false` if the chunk is not resident or the local coordinate is out
    /// of range; nothing changes in that case.
    pub fn set_block(&mut self, location: BlockLocation, block: BlockType, place_mode: bool) -> bool {
        let value = if place_mode { block } else { BlockType::AIR };
        let dimensions = self.dimensions();

        let Some(chunk) = self.chunk_mut(location.chunk) else {
            warn!("Ignoring edit in unloaded chunk {:?}", location.chunk);
            return false;
        };
        let BlockLocation { chunk: position, local } = location;
        if !chunk.set_block(local.x, local.y, local.z, value) {
            warn!("Ignoring edit at out-of-range local {:?} in chunk {:?}", local, position);
            return false;
        }
        debug!("Set {:?} at {:?} in chunk {:?}", value, local, position);

        self.remesh(position);

        let max_x = dimensions.size_x as i32 - 1;
        let max_z = dimensions.size_z as i32 - 1;
        let borders = [
            (local.x == 0, Vector3::new(-1, 0, 0)),
            (local.x == max_x, Vector3::new(1, 0, 0)),
            (local.z == 0, Vector3::new(0, 0, -1)),
            (local.z == max_z, Vector3::new(0, 0, 1)),
        ];
        for (on_border, offset) in borders {
            if on_border {
                self.refresh(position + offset);
            }
        }

        true
    }

    /// Applies an edit to a raycast hit.
    ///
    /// # Returns
    /// `false` if nothing was written, e.g. placing with no empty cell.
    pub fn apply_edit(&mut self, hit: &RaycastHit, action: EditAction) -> bool {
        match action {
            EditAction::Place(block) => match hit.empty {
                Some(empty) => self.set_block(empty, block, true),
                None => false,
            },
            EditAction::Break => self.set_block(hit.solid, BlockType::AIR, false),
        }
    }
}
