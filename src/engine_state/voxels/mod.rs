//! # Voxel World Core
//!
//! This module contains the voxel world: how blocks are stored, generated,
//! streamed around the viewer and targeted by the player.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, faces and their atlas appearance
//! * **Chunk**: Fixed-size dense block grids with lifecycle flags
//! * **Terrain**: Height field, column filling and decoration
//! * **World**: Resident chunks, ring-ordered loading and the mesh queue
//! * **Raycast**: Block targeting and single-block edits
//!
//! ## Data Flow
//!
//! 1. The world receives the viewer position each frame
//! 2. Missing chunks in range are generated and queued for meshing
//! 3. Chunks out of range are dropped along with their GPU buffers
//! 4. A bounded number of queued chunks are meshed and uploaded
//! 5. Edits change one block and remesh the affected chunks immediately
//!
//! ## Thread Safety
//!
//! None is needed: the world is owned by one frame loop on the thread that
//! owns the render context.

pub mod block;
pub mod chunk;
pub mod raycast;
pub mod terrain;
pub mod world;
