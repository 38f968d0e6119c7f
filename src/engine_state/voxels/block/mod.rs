//! # Block Module
//!
//! Block types, block faces, and the mapping from a block type to its cells in
//! the shared texture atlas.

use block_side::FaceSlot;
use block_type::BlockType;

use crate::config::ATLAS_CELLS_PER_SIDE;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to store block types in chunks.
pub type BlockTypeSize = u8;

/// One cell of the texture atlas, addressed by column and row.
///
/// Row 0 is the bottom row of the atlas image (the image is flipped on load).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasCell {
    /// Column from the left edge.
    pub column: u32,
    /// Row from the bottom edge.
    pub row: u32,
}

impl AtlasCell {
    /// Creates a cell reference.
    pub const fn new(column: u32, row: u32) -> Self {
        AtlasCell { column, row }
    }

    /// UV coordinates of the cell corners, ordered bottom-left, bottom-right,
    /// top-right, top-left to match the corner order of `BlockSide::corners`.
    pub fn uv_quad(self) -> [[f32; 2]; 4] {
        let cell = 1.0 / ATLAS_CELLS_PER_SIDE as f32;
        let u0 = self.column as f32 * cell;
        let v0 = self.row as f32 * cell;
        let u1 = u0 + cell;
        let v1 = v0 + cell;
        [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
    }
}

/// Atlas cells used by the three face slots of one block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockAppearance {
    /// Cell for the four vertical faces.
    pub side: AtlasCell,
    /// Cell for the +Y face.
    pub top: AtlasCell,
    /// Cell for the -Y face.
    pub bottom: AtlasCell,
}

impl BlockAppearance {
    const fn uniform(cell: AtlasCell) -> Self {
        BlockAppearance {
            side: cell,
            top: cell,
            bottom: cell,
        }
    }

    /// The cell a given face slot samples.
    pub fn cell(&self, slot: FaceSlot) -> AtlasCell {
        match slot {
            FaceSlot::Side => self.side,
            FaceSlot::Top => self.top,
            FaceSlot::Bottom => self.bottom,
        }
    }
}

const DIRT: AtlasCell = AtlasCell::new(2, 0);

impl BlockType {
    /// Looks up where this block's faces live in the texture atlas.
    ///
    /// `AIR` has no appearance.
    pub fn appearance(self) -> Option<BlockAppearance> {
        let appearance = match self {
            BlockType::AIR => return None,
            BlockType::GRASS => BlockAppearance {
                side: AtlasCell::new(1, 0),
                top: AtlasCell::new(0, 0),
                bottom: DIRT,
            },
            BlockType::STONE => BlockAppearance::uniform(AtlasCell::new(3, 0)),
            BlockType::SNOW => BlockAppearance {
                side: AtlasCell::new(5, 0),
                top: AtlasCell::new(4, 0),
                bottom: DIRT,
            },
            BlockType::SAND => BlockAppearance::uniform(AtlasCell::new(6, 0)),
            BlockType::WOOD => BlockAppearance {
                side: AtlasCell::new(7, 0),
                top: AtlasCell::new(8, 0),
                bottom: AtlasCell::new(8, 0),
            },
            BlockType::LEAVES => BlockAppearance::uniform(AtlasCell::new(9, 0)),
            BlockType::WATER => BlockAppearance::uniform(AtlasCell::new(10, 0)),
            BlockType::BEDROCK => BlockAppearance::uniform(AtlasCell::new(11, 0)),
        };
        Some(appearance)
    }
}
