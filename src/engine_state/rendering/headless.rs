//! A render backend with no GPU behind it.
//!
//! Tracks which chunk buffers are alive and counts every call, which is all
//! the headless frame loop and the tests need.

use std::collections::HashMap;

use cgmath::Matrix4;
use log::warn;

use super::{ChunkHandle, RenderBackend, Vertex};

/// Sizes of one uploaded mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UploadedMesh {
    /// Number of vertices uploaded.
    pub vertex_count: usize,
    /// Number of indices uploaded.
    pub index_count: usize,
}

/// Bookkeeping-only [`RenderBackend`].
#[derive(Debug, Default)]
pub struct HeadlessRenderBackend {
    live: HashMap<ChunkHandle, UploadedMesh>,
    frame_draws: Vec<(ChunkHandle, Matrix4<f32>)>,
    uploads: usize,
    draws: usize,
    destroys: usize,
}

impl HeadlessRenderBackend {
    /// Whether buffers exist for `handle`.
    pub fn is_live(&self, handle: ChunkHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of handles with live buffers.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Sizes of the mesh last uploaded under `handle`.
    pub fn uploaded(&self, handle: ChunkHandle) -> Option<UploadedMesh> {
        self.live.get(&handle).copied()
    }

    /// Total `upload_mesh` calls.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Total `draw` calls.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Total `destroy` calls that released live buffers.
    pub fn destroy_count(&self) -> usize {
        self.destroys
    }

    /// Draws recorded since the last call, in submission order.
    pub fn take_frame_draws(&mut self) -> Vec<(ChunkHandle, Matrix4<f32>)> {
        std::mem::take(&mut self.frame_draws)
    }
}

impl RenderBackend for HeadlessRenderBackend {
    fn upload_mesh(&mut self, handle: ChunkHandle, vertices: &[Vertex], indices: &[u32]) {
        self.uploads += 1;
        self.live.insert(
            handle,
            UploadedMesh {
                vertex_count: vertices.len(),
                index_count: indices.len(),
            },
        );
    }

    fn draw(&mut self, handle: ChunkHandle, transform: Matrix4<f32>) {
        if !self.live.contains_key(&handle) {
            warn!("Draw requested for unknown {:?}", handle);
            return;
        }
        self.draws += 1;
        self.frame_draws.push((handle, transform));
    }

    fn destroy(&mut self, handle: ChunkHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroys += 1;
        } else {
            warn!("Destroy requested for unknown {:?}", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::SquareMatrix;

    use super::*;

    #[test]
    fn unknown_handles_are_ignored() {
        let mut backend = HeadlessRenderBackend::default();
        backend.draw(ChunkHandle(1), Matrix4::identity());
        backend.destroy(ChunkHandle(1));
        assert_eq!(backend.draw_count(), 0);
        assert_eq!(backend.destroy_count(), 0);
    }

    #[test]
    fn draws_are_collected_per_frame() {
        let mut backend = HeadlessRenderBackend::default();
        backend.upload_mesh(ChunkHandle(3), &[], &[]);
        backend.draw(ChunkHandle(3), Matrix4::identity());
        assert_eq!(backend.take_frame_draws().len(), 1);
        assert!(backend.take_frame_draws().is_empty());
        assert_eq!(backend.draw_count(), 1);
        assert_eq!(
            backend.uploaded(ChunkHandle(3)),
            Some(UploadedMesh {
                vertex_count: 0,
                index_count: 0
            })
        );
    }
}
