//! Mesh generation for voxel rendering.
//!
//! Converts a chunk's block grid into a culled triangle mesh. See
//! [`mesh::build_mesh`].

pub mod mesh;

pub use mesh::{build_mesh, ChunkMesh, ChunkNeighbors};
