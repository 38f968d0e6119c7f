//! # Block Type Module
//!
//! This module defines the closed set of block types in the voxel world and
//! the conversions between the enum and its compact storage tag.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block types in the voxel world.
///
/// The discriminant is the 8-bit storage tag. `AIR` is zero so that a freshly
/// allocated chunk is entirely empty.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never meshed; exposes the faces of its neighbours.
    #[default]
    AIR = 0,

    /// Grass with a green top, grass-edged sides and a dirt bottom.
    GRASS = 1,

    /// Plain stone, the bulk of every column.
    STONE = 2,

    /// Snow cap used on high surfaces.
    SNOW = 3,

    /// Sand used on low surfaces just above the water line.
    SAND = 4,

    /// Tree trunk.
    WOOD = 5,

    /// Tree canopy.
    LEAVES = 6,

    /// Water surface below the water level.
    WATER = 7,

    /// Unbreakable-looking floor at y = 0.
    BEDROCK = 8,
}

impl BlockType {
    /// First and last tags a player can hold and place.
    const FIRST_PLACEABLE: BlockTypeSize = BlockType::GRASS as BlockTypeSize;
    const LAST_PLACEABLE: BlockTypeSize = BlockType::BEDROCK as BlockTypeSize;

    /// Number of block types a player can hold.
    pub const PLACEABLE_COUNT: i32 = (Self::LAST_PLACEABLE - Self::FIRST_PLACEABLE + 1) as i32;

    /// Converts a storage tag back into a block type.
    ///
    /// Returns `None` for tags that do not name a block.
    pub fn from_raw(raw: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(raw)
    }

    /// The compact storage tag of this block type.
    pub fn as_raw(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether the block occupies its cell and hides neighbouring faces.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Whether a player may hold and place this block.
    pub fn is_placeable(self) -> bool {
        (Self::FIRST_PLACEABLE..=Self::LAST_PLACEABLE).contains(&self.as_raw())
    }

    /// The next placeable block, wrapping from the last back to the first.
    ///
    /// `AIR` steps to the first placeable block.
    pub fn next_placeable(self) -> Self {
        let raw = self.as_raw();
        let next = if raw >= Self::LAST_PLACEABLE {
            Self::FIRST_PLACEABLE
        } else {
            raw.max(Self::FIRST_PLACEABLE - 1) + 1
        };
        Self::from_raw(next).unwrap_or(BlockType::GRASS)
    }

    /// The previous placeable block, wrapping from the first to the last.
    pub fn previous_placeable(self) -> Self {
        let raw = self.as_raw();
        let previous = if raw <= Self::FIRST_PLACEABLE {
            Self::LAST_PLACEABLE
        } else {
            raw - 1
        };
        Self::from_raw(previous).unwrap_or(BlockType::GRASS)
    }
}
