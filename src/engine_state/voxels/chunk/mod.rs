//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-extent column of blocks
//! that is the unit of generation, meshing, and streaming.
//!
//! ## Storage Layout
//!
//! Blocks are stored densely, one `BlockType` tag per cell, in a single
//! `Vec`. The cell `(x, y, z)` lives at
//!
//! ```text
//! x + y * size_x + z * size_x * height
//! ```
//!
//! Generation, meshing and raycasting all go through [`ChunkDimensions::index`]
//! so the linearization cannot drift between them.
//!
//! ## Lifecycle
//!
//! 1. Created empty (all `AIR`) when the world decides a coordinate is needed
//! 2. Filled exactly once by the terrain generator (`generated` flips true)
//! 3. Meshed from the streaming queue, and remeshed after every edit
//! 4. Dropped when it leaves the retention radius, which releases its GPU buffers

use cgmath::{Matrix4, Point3, Vector3};

use crate::config::WorldConfig;
use crate::engine_state::rendering::{meshing::mesh::ChunkMesh, ChunkBuffers};

use super::block::block_type::BlockType;

/// Extent of a chunk in blocks along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDimensions {
    /// Width along X.
    pub size_x: usize,
    /// Height along Y.
    pub height: usize,
    /// Depth along Z.
    pub size_z: usize,
}

impl ChunkDimensions {
    /// Creates a dimension triple.
    pub const fn new(size_x: usize, height: usize, size_z: usize) -> Self {
        ChunkDimensions {
            size_x,
            height,
            size_z,
        }
    }

    /// Square-footprint dimensions taken from a world configuration.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_height, config.chunk_size)
    }

    /// Number of cells in a chunk.
    pub fn volume(&self) -> usize {
        self.size_x * self.height * self.size_z
    }

    /// Whether a signed local coordinate lies inside the chunk.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.size_x
            && (y as usize) < self.height
            && (z as usize) < self.size_z
    }

    /// Linear index of an in-bounds local coordinate.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size_x + z * self.size_x * self.height
    }

    /// Inverse of [`ChunkDimensions::index`].
    pub fn coordinates(&self, index: usize) -> (usize, usize, usize) {
        let plane = self.size_x * self.height;
        let z = index / plane;
        let remainder = index % plane;
        (remainder % self.size_x, remainder / self.size_x, z)
    }

    /// Checked linear index of a signed local coordinate.
    pub fn checked_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if self.contains(x, y, z) {
            Some(self.index(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }
}

/// Where a chunk is in the streaming state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// No chunk at this coordinate.
    Unloaded,
    /// Terrain filled, waiting in the mesh queue.
    Generated,
    /// Mesh built and uploaded.
    Meshed,
}

/// Represents one column of voxel blocks in the world.
///
/// Chunks are keyed by a 2D grid coordinate; `position.y` is always 0 because
/// the world is not chunked vertically.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    dimensions: ChunkDimensions,

    /// Dense block storage, always exactly `dimensions.volume()` long.
    blocks: Vec<BlockType>,

    generated: bool,

    /// Last mesh built for this chunk.
    pub(crate) mesh: Option<ChunkMesh>,

    /// GPU buffers owned by this chunk, released on drop.
    pub(crate) buffers: Option<ChunkBuffers>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `dimensions` - The extent of the chunk in blocks
    pub fn empty(position: Point3<i32>, dimensions: ChunkDimensions) -> Self {
        Chunk {
            position,
            dimensions,
            blocks: vec![BlockType::AIR; dimensions.volume()],
            generated: false,
            mesh: None,
            buffers: None,
        }
    }

    /// The extent of this chunk.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.dimensions
    }

    /// Whether terrain generation has populated this chunk.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn mark_generated(&mut self) {
        self.generated = true;
    }

    /// The last mesh built for this chunk, if any.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Whether this chunk currently owns GPU buffers.
    pub fn has_buffers(&self) -> bool {
        self.buffers.is_some()
    }

    /// All blocks in linear index order.
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates fall outside the chunk.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.dimensions
            .checked_index(x, y, z)
            .map(|index| self.blocks[index])
    }

    /// Gets the block stored at a linear index.
    pub fn block_at_index(&self, index: usize) -> Option<BlockType> {
        self.blocks.get(index).copied()
    }

    /// Writes a block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `false` and leaves the chunk untouched if the coordinates fall outside
    /// the chunk.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        match self.dimensions.checked_index(x, y, z) {
            Some(index) => {
                self.blocks[index] = block;
                true
            }
            None => false,
        }
    }

    /// Whether the cell at the given coordinates holds a solid block.
    ///
    /// Out-of-bounds cells are not solid.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_some_and(BlockType::is_solid)
    }

    /// World-space offset of the chunk origin.
    pub fn world_offset(&self) -> Vector3<f32> {
        Vector3::new(
            (self.position.x * self.dimensions.size_x as i32) as f32,
            0.0,
            (self.position.z * self.dimensions.size_z as i32) as f32,
        )
    }

    /// Model matrix translating chunk-local geometry into world space.
    pub fn world_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.world_offset())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn index_is_a_bijection_over_the_chunk() {
        let dimensions = ChunkDimensions::new(5, 7, 3);
        let mut seen = HashSet::new();
        for z in 0..3 {
            for y in 0..7 {
                for x in 0..5 {
                    let index = dimensions.index(x, y, z);
                    assert!(index < dimensions.volume());
                    assert!(seen.insert(index), "({}, {}, {}) collides", x, y, z);
                    assert_eq!(dimensions.coordinates(index), (x, y, z));
                }
            }
        }
        assert_eq!(seen.len(), dimensions.volume());
    }

    #[test]
    fn linearization_is_x_then_y_then_z() {
        let dimensions = ChunkDimensions::new(16, 128, 16);
        assert_eq!(dimensions.index(1, 0, 0), 1);
        assert_eq!(dimensions.index(0, 1, 0), 16);
        assert_eq!(dimensions.index(0, 0, 1), 16 * 128);
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), ChunkDimensions::new(4, 4, 4));
        assert_eq!(chunk.get_block(-1, 0, 0), None);
        assert_eq!(chunk.get_block(0, 4, 0), None);
        assert!(!chunk.set_block(4, 0, 0, BlockType::STONE));
        assert!(!chunk.set_block(0, 0, -1, BlockType::STONE));
        assert!(chunk.blocks().iter().all(|b| *b == BlockType::AIR));

        assert!(chunk.set_block(3, 3, 3, BlockType::STONE));
        assert_eq!(chunk.get_block(3, 3, 3), Some(BlockType::STONE));
        assert!(chunk.is_block_solid(3, 3, 3));
        let index = chunk.dimensions().index(3, 3, 3);
        assert_eq!(chunk.block_at_index(index), Some(BlockType::STONE));
        assert_eq!(chunk.block_at_index(64), None);
    }

    #[test]
    fn new_chunks_are_empty_and_ungenerated() {
        let chunk = Chunk::empty(Point3::new(2, 0, -1), ChunkDimensions::new(16, 128, 16));
        assert_eq!(chunk.blocks().len(), 16 * 128 * 16);
        assert!(!chunk.is_generated());
        assert!(chunk.mesh().is_none());
        assert!(!chunk.has_buffers());
    }

    #[test]
    fn world_offset_scales_by_footprint() {
        let chunk = Chunk::empty(Point3::new(2, 0, -3), ChunkDimensions::new(16, 128, 16));
        assert_eq!(chunk.world_offset(), Vector3::new(32.0, 0.0, -48.0));
        let moved = chunk.world_transform() * cgmath::Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(moved, cgmath::Vector4::new(33.0, 2.0, -45.0, 1.0));
    }
}
