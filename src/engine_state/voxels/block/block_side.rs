//! # Block Side Module
//!
//! The six axis-aligned faces of a block, with the geometry the mesher needs
//! for each: outward normal, neighbour offset, quad corners and texture slot.

use cgmath::Vector3;

/// Which texture of a block's appearance a face uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceSlot {
    /// Any of the four vertical faces.
    Side,
    /// The +Y face.
    Top,
    /// The -Y face.
    Bottom,
}

/// The six faces of a voxel block.
///
/// The order is: [FRONT, BACK, RIGHT, LEFT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Faces positive Z.
    FRONT = 0,

    /// Faces negative Z.
    BACK = 1,

    /// Faces positive X.
    RIGHT = 2,

    /// Faces negative X.
    LEFT = 3,

    /// Faces positive Y.
    TOP = 4,

    /// Faces negative Y.
    BOTTOM = 5,
}

/// Corner signs of the unit cube, scaled by the block half-size at mesh time.
///
/// Each quad lists its corners counter-clockwise as seen from outside the
/// block, starting bottom-left, so indices `0 1 2 0 2 3` face outward.
const FACE_CORNERS: [[[i8; 3]; 4]; 6] = [
    // FRONT
    [[-1, -1, 1], [1, -1, 1], [1, 1, 1], [-1, 1, 1]],
    // BACK
    [[1, -1, -1], [-1, -1, -1], [-1, 1, -1], [1, 1, -1]],
    // RIGHT
    [[1, -1, 1], [1, -1, -1], [1, 1, -1], [1, 1, 1]],
    // LEFT
    [[-1, -1, -1], [-1, -1, 1], [-1, 1, 1], [-1, 1, -1]],
    // TOP
    [[-1, 1, 1], [1, 1, 1], [1, 1, -1], [-1, 1, -1]],
    // BOTTOM
    [[-1, -1, -1], [1, -1, -1], [1, -1, 1], [-1, -1, 1]],
];

impl BlockSide {
    /// All six faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// Offset from a block to the neighbour this face touches.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> [f32; 3] {
        let offset = self.offset();
        [offset.x as f32, offset.y as f32, offset.z as f32]
    }

    /// Texture slot this face samples.
    pub fn slot(self) -> FaceSlot {
        match self {
            BlockSide::TOP => FaceSlot::Top,
            BlockSide::BOTTOM => FaceSlot::Bottom,
            _ => FaceSlot::Side,
        }
    }

    /// The four corners of this face for a block centered at `center`.
    pub fn corners(self, center: [f32; 3], half_size: f32) -> [[f32; 3]; 4] {
        FACE_CORNERS[self as usize].map(|sign| {
            [
                center[0] + sign[0] as f32 * half_size,
                center[1] + sign[1] as f32 * half_size,
                center[2] + sign[2] as f32 * half_size,
            ]
        })
    }
}
