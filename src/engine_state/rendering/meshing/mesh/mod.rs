//! Mesh data structures for voxel rendering.
//!
//! A chunk's mesh is a flat vertex list plus a `u32` index list describing a
//! triangle list, ready for a single indexed draw.

use crate::engine_state::{rendering::Vertex, voxels::chunk::Chunk};

mod culled;

pub use culled::build_mesh;

/// Vertices emitted per visible face.
pub const VERTICES_PER_QUAD: usize = 4;
/// Indices emitted per visible face.
pub const INDICES_PER_QUAD: usize = 6;

/// Triangle mesh of one chunk in chunk-local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Four vertices per visible face.
    pub vertices: Vec<Vertex>,
    /// Six indices per visible face, two triangles sharing a diagonal.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Number of faces in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one quad, offsetting its indices by the current vertex count.
    pub(crate) fn push_quad(&mut self, corners: [Vertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Resident chunks bordering the one being meshed.
///
/// A missing neighbour leaves the faces on that border exposed.
#[derive(Copy, Clone, Default)]
pub struct ChunkNeighbors<'a> {
    /// Chunk at `x + 1`.
    pub pos_x: Option<&'a Chunk>,
    /// Chunk at `x - 1`.
    pub neg_x: Option<&'a Chunk>,
    /// Chunk at `z + 1`.
    pub pos_z: Option<&'a Chunk>,
    /// Chunk at `z - 1`.
    pub neg_z: Option<&'a Chunk>,
}

impl ChunkNeighbors<'_> {
    /// No neighbours: every border face is exposed.
    pub fn none() -> Self {
        Self::default()
    }
}
