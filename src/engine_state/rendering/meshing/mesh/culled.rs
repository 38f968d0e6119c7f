//! Per-block face culling.
//!
//! Every solid block contributes one quad for each of its six faces whose
//! neighbouring cell is empty. Faces are not merged, so the quad count equals
//! the exposed surface area in block faces.

use log::trace;
use web_time::Instant;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{block::block_side::BlockSide, chunk::Chunk},
};

use super::{ChunkMesh, ChunkNeighbors};

/// Builds the mesh of `chunk`.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `neighbours` - Resident chunks on the four horizontal borders
/// * `block_render_size` - Half the edge length of a rendered block
///
/// # Returns
/// A `ChunkMesh` in chunk-local space, blocks centered on their integer
/// coordinates.
pub fn build_mesh(
    chunk: &Chunk,
    neighbours: ChunkNeighbors<'_>,
    block_render_size: f32,
) -> ChunkMesh {
    let start = Instant::now();
    let dimensions = chunk.dimensions();
    let mut mesh = ChunkMesh::default();

    for z in 0..dimensions.size_z as i32 {
        for y in 0..dimensions.height as i32 {
            for x in 0..dimensions.size_x as i32 {
                let Some(block) = chunk.get_block(x, y, z) else {
                    continue;
                };
                let Some(appearance) = block.appearance() else {
                    continue;
                };
                let center = [x as f32, y as f32, z as f32];

                for side in BlockSide::all() {
                    if is_face_hidden(chunk, &neighbours, x, y, z, side) {
                        continue;
                    }

                    let corners = side.corners(center, block_render_size);
                    let uvs = appearance.cell(side.slot()).uv_quad();
                    let normal = side.normal();
                    mesh.push_quad([
                        Vertex::new(corners[0], normal, uvs[0]),
                        Vertex::new(corners[1], normal, uvs[1]),
                        Vertex::new(corners[2], normal, uvs[2]),
                        Vertex::new(corners[3], normal, uvs[3]),
                    ]);
                }
            }
        }
    }

    trace!(
        "Meshed chunk {:?}: {} quads in {:?}",
        chunk.position,
        mesh.quad_count(),
        start.elapsed()
    );

    mesh
}

/// Whether the cell across `side` from `(x, y, z)` holds a solid block.
///
/// Cells above or below the chunk never occlude. Cells across a horizontal
/// border are read from the resident neighbour, if it has the same extent.
fn is_face_hidden(
    chunk: &Chunk,
    neighbours: &ChunkNeighbors<'_>,
    x: i32,
    y: i32,
    z: i32,
    side: BlockSide,
) -> bool {
    let offset = side.offset();
    let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
    let dimensions = chunk.dimensions();

    if dimensions.contains(nx, ny, nz) {
        return chunk.is_block_solid(nx, ny, nz);
    }
    if ny < 0 || ny >= dimensions.height as i32 {
        return false;
    }

    let size_x = dimensions.size_x as i32;
    let size_z = dimensions.size_z as i32;
    let (neighbour, lx, lz) = if nx >= size_x {
        (neighbours.pos_x, nx - size_x, nz)
    } else if nx < 0 {
        (neighbours.neg_x, nx + size_x, nz)
    } else if nz >= size_z {
        (neighbours.pos_z, nx, nz - size_z)
    } else {
        (neighbours.neg_z, nx, nz + size_z)
    };

    match neighbour {
        Some(neighbour) if neighbour.dimensions() == dimensions => {
            neighbour.is_block_solid(lx, ny, lz)
        }
        _ => false,
    }
}
