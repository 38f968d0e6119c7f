//! # World Module
//!
//! This module provides the `World` struct which owns every resident chunk and
//! streams chunks in and out around the viewer.
//!
//! ## Streaming
//!
//! Each call to [`World::update`] runs three phases in order:
//!
//! 1. **Load**: every missing coordinate within the retention radius is
//!    created, filled by the terrain generator and queued for meshing. Rings
//!    are visited from the viewer outward so nearby chunks are queued first.
//! 2. **Unload**: every chunk farther than the radius on either axis is
//!    dropped, which releases its GPU buffers immediately. Meshed chunks
//!    bordering a dropped one are remeshed on the spot so their border faces
//!    show again.
//! 3. **Mesh**: at most `chunks_per_frame` coordinates are taken from the
//!    queue. A coordinate whose chunk was unloaded in the meantime is
//!    discarded; it still uses up one slot of the budget.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by chunk coordinate
//! - Generation is unbounded per update, meshing is bounded
//! - Edits remesh synchronously and bypass the queue

use std::collections::{HashMap, HashSet, VecDeque};

use cgmath::{Point3, Vector3};
use log::{debug, info};

use crate::{
    config::{ConfigError, WorldConfig},
    core::StResource,
    engine_state::rendering::{
        meshing::{build_mesh, ChunkNeighbors},
        ChunkBuffers, ChunkHandle, RenderBackend,
    },
};

use super::{
    chunk::{Chunk, ChunkDimensions, ChunkState},
    terrain::TerrainGenerator,
};

/// What one call to [`World::update`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunks created and generated.
    pub loaded: usize,
    /// Chunks dropped for leaving the retention radius.
    pub unloaded: usize,
    /// Meshed chunks rebuilt because a bordering chunk was dropped.
    pub exposed: usize,
    /// Queued chunks meshed and uploaded.
    pub meshed: usize,
    /// Queue entries whose chunk no longer existed.
    pub discarded: usize,
}

impl UpdateReport {
    /// Whether the update changed anything.
    pub fn is_idle(&self) -> bool {
        *self == UpdateReport::default()
    }
}

/// Offsets to the chunks sharing a border: +X, -X, +Z, -Z.
const HORIZONTAL_NEIGHBOURS: [Vector3<i32>; 4] = [
    Vector3 { x: 1, y: 0, z: 0 },
    Vector3 { x: -1, y: 0, z: 0 },
    Vector3 { x: 0, y: 0, z: 1 },
    Vector3 { x: 0, y: 0, z: -1 },
];

/// Coordinates of every chunk within `radius` of `center`, nearest ring first.
///
/// Ring `r` is walked along its forward edge (`z = +r`), then right
/// (`x = +r`), backward (`z = -r`) and left (`x = -r`). Each coordinate
/// appears once.
pub fn ring_positions(center: Point3<i32>, radius: i32) -> Vec<Point3<i32>> {
    let side = (2 * radius.max(0) + 1) as usize;
    let mut positions = Vec::with_capacity(side * side);
    let at = |dx: i32, dz: i32| Point3::new(center.x + dx, 0, center.z + dz);

    for r in 0..=radius {
        if r == 0 {
            positions.push(at(0, 0));
            continue;
        }
        for i in -r..=r {
            positions.push(at(i, r));
        }
        for i in -r + 1..r {
            positions.push(at(r, i));
        }
        for i in -r + 1..=r {
            positions.push(at(i, -r));
        }
        for i in -r..r {
            positions.push(at(-r, i));
        }
    }

    positions
}

/// Represents the voxel world: resident chunks plus the mesh queue.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{
///     config::WorldConfig,
///     core::StResource,
///     engine_state::{
///         rendering::{share_backend, HeadlessRenderBackend},
///         voxels::world::World,
///     },
/// };
///
/// let config = WorldConfig { render_distance: 1, ..WorldConfig::default() };
/// let backend = StResource::new(HeadlessRenderBackend::default());
/// let mut world = World::new(config, share_backend(&backend)).unwrap();
///
/// let report = world.update(Point3::new(0.0, 70.0, 0.0));
/// assert_eq!(report.loaded, 9);
/// assert_eq!(world.queued_len(), 9 - report.meshed);
/// ```
pub struct World {
    config: WorldConfig,
    dimensions: ChunkDimensions,
    generator: TerrainGenerator,
    backend: StResource<dyn RenderBackend>,
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,
    /// Coordinates waiting for their first mesh, oldest first.
    mesh_queue: VecDeque<Point3<i32>>,
    next_handle: u64,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `config` - World parameters, fixed for the lifetime of the world
    /// * `backend` - Render backend that receives chunk meshes
    ///
    /// # Errors
    /// `ConfigError::Invalid` if `config` fails [`WorldConfig::validate`].
    pub fn new(
        config: WorldConfig,
        backend: StResource<dyn RenderBackend>,
    ) -> Result<Self, ConfigError> {
        let generator = TerrainGenerator::new(&config);
        Self::with_generator(config, generator, backend)
    }

    /// Creates a new, empty world with a custom terrain generator.
    ///
    /// # Errors
    /// `ConfigError::Invalid` if `config` fails [`WorldConfig::validate`].
    pub fn with_generator(
        config: WorldConfig,
        generator: TerrainGenerator,
        backend: StResource<dyn RenderBackend>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = ChunkDimensions::from_config(&config);
        info!(
            "Created world: chunks {}x{}x{}, render distance {}, {} mesh builds per update",
            dimensions.size_x,
            dimensions.height,
            dimensions.size_z,
            config.render_distance,
            config.chunks_per_frame
        );
        Ok(World {
            config,
            dimensions,
            generator,
            backend,
            chunks: HashMap::new(),
            mesh_queue: VecDeque::new(),
            next_handle: 0,
        })
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Extent of every chunk in this world.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.dimensions
    }

    /// The generator used to fill new chunks.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Chunk coordinate containing a world-space position.
    pub fn viewer_chunk(&self, position: Point3<f32>) -> Point3<i32> {
        Point3::new(
            (position.x / self.dimensions.size_x as f32).floor() as i32,
            0,
            (position.z / self.dimensions.size_z as f32).floor() as i32,
        )
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn chunk(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub(crate) fn chunk_mut(&mut self, position: Point3<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Streaming state of a chunk coordinate.
    pub fn chunk_state(&self, position: Point3<i32>) -> ChunkState {
        match self.chunks.get(&position) {
            None => ChunkState::Unloaded,
            Some(chunk) if chunk.mesh().is_some() => ChunkState::Meshed,
            Some(_) => ChunkState::Generated,
        }
    }

    /// Coordinates of every resident chunk, in no particular order.
    pub fn resident_positions(&self) -> Vec<Point3<i32>> {
        self.chunks.keys().copied().collect()
    }

    /// Number of resident chunks.
    pub fn resident_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of coordinates waiting in the mesh queue.
    pub fn queued_len(&self) -> usize {
        self.mesh_queue.len()
    }

    /// Streams chunks around the viewer.
    ///
    /// # Arguments
    /// * `viewer_position` - World-space position of the viewer
    ///
    /// # Returns
    /// Counts of what each phase did.
    pub fn update(&mut self, viewer_position: Point3<f32>) -> UpdateReport {
        let center = self.viewer_chunk(viewer_position);
        let radius = self.config.render_distance;
        let mut report = UpdateReport::default();

        for position in ring_positions(center, radius) {
            if self.chunks.contains_key(&position) {
                continue;
            }
            let mut chunk = Chunk::empty(position, self.dimensions);
            self.generator.fill(&mut chunk);
            self.chunks.insert(position, chunk);
            self.mesh_queue.push_back(position);
            report.loaded += 1;
        }

        let evicted: Vec<Point3<i32>> = self
            .chunks
            .keys()
            .filter(|position| {
                (position.x - center.x).abs() > radius || (position.z - center.z).abs() > radius
            })
            .copied()
            .collect();
        for position in &evicted {
            self.chunks.remove(position);
        }
        report.unloaded = evicted.len();

        // Border faces culled against a dropped chunk must be rebuilt.
        let exposed: HashSet<Point3<i32>> = evicted
            .iter()
            .flat_map(|position| HORIZONTAL_NEIGHBOURS.map(|offset| *position + offset))
            .filter(|position| self.chunks.contains_key(position))
            .collect();
        for position in exposed {
            if self.refresh(position) {
                report.exposed += 1;
            }
        }

        let mut processed = 0;
        while processed < self.config.chunks_per_frame {
            let Some(position) = self.mesh_queue.pop_front() else {
                break;
            };
            processed += 1;
            if self.remesh(position) {
                report.meshed += 1;
            } else {
                report.discarded += 1;
            }
        }

        if !report.is_idle() {
            debug!(
                "World update around {:?}: loaded {}, unloaded {}, exposed {}, meshed {}, discarded {}, {} queued",
                center,
                report.loaded,
                report.unloaded,
                report.exposed,
                report.meshed,
                report.discarded,
                self.mesh_queue.len()
            );
        }

        report
    }

    /// Rebuilds and uploads the mesh of one chunk.
    ///
    /// # Returns
    /// `false` if no chunk is resident at `position`.
    pub(crate) fn remesh(&mut self, position: Point3<i32>) -> bool {
        let Some(chunk) = self.chunks.get(&position) else {
            return false;
        };
        let [pos_x, neg_x, pos_z, neg_z] =
            HORIZONTAL_NEIGHBOURS.map(|offset| self.chunks.get(&(position + offset)));
        let neighbours = ChunkNeighbors {
            pos_x,
            neg_x,
            pos_z,
            neg_z,
        };
        let mesh = build_mesh(chunk, neighbours, self.config.block_render_size);

        let Some(chunk) = self.chunks.get_mut(&position) else {
            return false;
        };
        match &chunk.buffers {
            Some(buffers) => buffers.reupload(&mesh),
            None => {
                let handle = ChunkHandle(self.next_handle);
                self.next_handle += 1;
                chunk.buffers = Some(ChunkBuffers::upload(&self.backend, handle, &mesh));
            }
        }
        chunk.mesh = Some(mesh);
        true
    }

    /// Remeshes `position` only if it has been meshed before.
    pub(crate) fn refresh(&mut self, position: Point3<i32>) -> bool {
        self.chunk_state(position) == ChunkState::Meshed && self.remesh(position)
    }

    /// Draws every chunk with a non-empty mesh at its world transform.
    ///
    /// # Returns
    /// The number of chunks drawn.
    pub fn render(&self) -> usize {
        let mut backend = self.backend.get_mut();
        let mut drawn = 0;
        for chunk in self.chunks.values() {
            let (Some(buffers), Some(mesh)) = (&chunk.buffers, &chunk.mesh) else {
                continue;
            };
            if mesh.is_empty() {
                continue;
            }
            backend.draw(buffers.handle(), chunk.world_transform());
            drawn += 1;
        }
        drawn
    }
}
