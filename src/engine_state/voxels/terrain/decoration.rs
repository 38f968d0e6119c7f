//! # Decoration
//!
//! Passes that run after a chunk's columns are filled and stamp features such
//! as trees on top of the terrain surface.

use crate::engine_state::voxels::{block::block_type::BlockType, chunk::Chunk};

/// Top of one terrain column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SurfaceColumn {
    /// Number of filled cells in the column; the first air cell is at this y.
    pub height: i32,
    /// Block at `height - 1`, or `None` for an empty column.
    pub block: Option<BlockType>,
}

impl SurfaceColumn {
    /// Whether a tree may grow on this column.
    pub fn supports_tree(&self) -> bool {
        matches!(
            self.block,
            Some(block) if block != BlockType::SAND && block != BlockType::WATER
        )
    }
}

/// Surface of every column of a freshly filled chunk.
pub struct SurfaceMap {
    size_x: usize,
    size_z: usize,
    columns: Vec<SurfaceColumn>,
}

impl SurfaceMap {
    pub(crate) fn new(size_x: usize, size_z: usize) -> Self {
        SurfaceMap {
            size_x,
            size_z,
            columns: vec![
                SurfaceColumn {
                    height: 0,
                    block: None,
                };
                size_x * size_z
            ],
        }
    }

    pub(crate) fn set(&mut self, x: usize, z: usize, column: SurfaceColumn) {
        self.columns[x + z * self.size_x] = column;
    }

    /// The surface of a local column, if it lies inside the chunk.
    pub fn column(&self, x: usize, z: usize) -> Option<SurfaceColumn> {
        if x < self.size_x && z < self.size_z {
            Some(self.columns[x + z * self.size_x])
        } else {
            None
        }
    }

    /// Footprint covered by this map.
    pub fn footprint(&self) -> (usize, usize) {
        (self.size_x, self.size_z)
    }
}

/// A pass that adds features to a filled chunk.
pub trait Decoration {
    /// Stamps features into `chunk` using the column surfaces in `surface`.
    fn decorate(&self, chunk: &mut Chunk, surface: &SurfaceMap);
}

/// Leaves the terrain bare.
pub struct NoDecoration;

impl Decoration for NoDecoration {
    fn decorate(&self, _chunk: &mut Chunk, _surface: &SurfaceMap) {}
}

/// One tree per chunk at a fixed local column.
pub struct SingleColumnTree {
    /// Local x of the tree column.
    pub x: usize,
    /// Local z of the tree column.
    pub z: usize,
}

impl Decoration for SingleColumnTree {
    fn decorate(&self, chunk: &mut Chunk, surface: &SurfaceMap) {
        if let Some(column) = surface.column(self.x, self.z) {
            if column.supports_tree() {
                stamp_tree(chunk, self.x as i32, column.height, self.z as i32);
            }
        }
    }
}

/// Trees on any suitable column, chosen by a per-column seeded roll.
///
/// The roll depends only on the seed and the world column, so a chunk grows
/// the same trees every time it is generated.
pub struct ScatteredTrees {
    /// Probability that a suitable column grows a tree.
    pub chance: f64,
    /// Seed mixed into every column roll.
    pub seed: u32,
}

impl ScatteredTrees {
    fn roll(&self, world_x: i32, world_z: i32) -> f64 {
        let column = ((world_x as u32 as u64) << 32) | world_z as u32 as u64;
        let key = column.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ self.seed as u64;
        fastrand::Rng::with_seed(key).f64()
    }
}

impl Decoration for ScatteredTrees {
    fn decorate(&self, chunk: &mut Chunk, surface: &SurfaceMap) {
        let (size_x, size_z) = surface.footprint();
        let origin_x = chunk.position.x * size_x as i32;
        let origin_z = chunk.position.z * size_z as i32;

        // Only columns whose full canopy fits inside the chunk.
        for z in CANOPY_RADIUS..size_z.saturating_sub(CANOPY_RADIUS) {
            for x in CANOPY_RADIUS..size_x.saturating_sub(CANOPY_RADIUS) {
                let Some(column) = surface.column(x, z) else {
                    continue;
                };
                if !column.supports_tree() {
                    continue;
                }
                if self.roll(origin_x + x as i32, origin_z + z as i32) < self.chance {
                    stamp_tree(chunk, x as i32, column.height, z as i32);
                }
            }
        }
    }
}

/// Horizontal reach of the widest canopy layer from the trunk.
const CANOPY_RADIUS: usize = 2;

/// Wood blocks in a trunk.
const TRUNK_HEIGHT: i32 = 5;

/// Stamps a tree whose trunk starts at `(x, base_y, z)`.
///
/// The trunk is five wood blocks tall and reaches into the canopy. The two
/// layers from `base_y + 4` are a 5x5 leaf square and the two above are a
/// 3x3 cap. Cells outside the chunk are skipped.
pub fn stamp_tree(chunk: &mut Chunk, x: i32, base_y: i32, z: i32) {
    let layers = [(4, 2), (5, 2), (6, 1), (7, 1)];
    for (rise, radius) in layers {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                chunk.set_block(x + dx, base_y + rise, z + dz, BlockType::LEAVES);
            }
        }
    }

    // Trunk last so it stays whole inside the lowest leaf layer.
    for y in base_y..base_y + TRUNK_HEIGHT {
        chunk.set_block(x, y, z, BlockType::WOOD);
    }
}
