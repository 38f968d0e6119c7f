//! Rendering seam for the voxel engine.
//!
//! The voxel core never talks to a GPU directly. It builds meshes, then asks a
//! [`RenderBackend`] to upload, draw and destroy them by [`ChunkHandle`].
//! Each chunk owns its GPU buffers through a [`ChunkBuffers`] guard, so
//! dropping a chunk (eviction, world teardown, unwinding) always releases
//! them.
//!
//! ## Backends
//!
//! * [`HeadlessRenderBackend`] keeps bookkeeping only. Used by the headless
//!   frame loop and by tests.
//! * [`WgpuRenderBackend`] owns real `wgpu` buffers and replays draws into a
//!   host-provided render pass.

use cgmath::Matrix4;
use log::warn;

use crate::core::StResource;

pub mod headless;
pub mod meshing;
mod vertex;
pub mod wgpu_backend;

pub use headless::HeadlessRenderBackend;
pub use meshing::mesh::ChunkMesh;
pub use vertex::Vertex;
pub use wgpu_backend::WgpuRenderBackend;

/// Identifies one chunk's buffers inside a render backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkHandle(pub u64);

/// GPU operations the voxel core needs.
///
/// All calls happen on the thread that owns the render context.
pub trait RenderBackend {
    /// Creates or replaces the buffers behind `handle`.
    fn upload_mesh(&mut self, handle: ChunkHandle, vertices: &[Vertex], indices: &[u32]);

    /// Draws the buffers behind `handle` as an indexed triangle list.
    fn draw(&mut self, handle: ChunkHandle, transform: Matrix4<f32>);

    /// Releases the buffers behind `handle`.
    fn destroy(&mut self, handle: ChunkHandle);
}

/// Shares a concrete backend as a trait object while the caller keeps a
/// typed handle to it.
pub fn share_backend<B: RenderBackend + 'static>(
    backend: &StResource<B>,
) -> StResource<dyn RenderBackend> {
    StResource::<dyn RenderBackend>::from_rc(backend.resource.clone())
}

/// Scoped ownership of one chunk's GPU buffers.
///
/// Created by the first upload of a chunk's mesh; later meshes reuse the same
/// handle. Dropping the guard destroys the buffers.
pub struct ChunkBuffers {
    handle: ChunkHandle,
    backend: StResource<dyn RenderBackend>,
}

impl ChunkBuffers {
    /// Uploads `mesh` under a fresh handle and takes ownership of the buffers.
    pub(crate) fn upload(
        backend: &StResource<dyn RenderBackend>,
        handle: ChunkHandle,
        mesh: &ChunkMesh,
    ) -> Self {
        backend
            .get_mut()
            .upload_mesh(handle, &mesh.vertices, &mesh.indices);
        ChunkBuffers {
            handle,
            backend: backend.clone(),
        }
    }

    /// Replaces the buffer contents with a rebuilt mesh.
    pub(crate) fn reupload(&self, mesh: &ChunkMesh) {
        self.backend
            .get_mut()
            .upload_mesh(self.handle, &mesh.vertices, &mesh.indices);
    }

    /// Handle of the owned buffers.
    pub fn handle(&self) -> ChunkHandle {
        self.handle
    }
}

impl Drop for ChunkBuffers {
    fn drop(&mut self) {
        match self.backend.try_get_mut() {
            Some(mut backend) => backend.destroy(self.handle),
            None => warn!(
                "Render backend busy while releasing {:?}; buffers leaked",
                self.handle
            ),
        }
    }
}
