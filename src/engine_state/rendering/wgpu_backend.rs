//! `wgpu` implementation of the render backend.
//!
//! Every chunk gets its own vertex buffer, `u32` index buffer and a 64-byte
//! uniform holding its model matrix. `draw` only queues the chunk; the host
//! replays the queue into its render pass with [`WgpuRenderBackend::record`]
//! after binding its own pipeline, camera and atlas.
//!
//! The model matrix is bound at the group index passed to `record`, binding 0,
//! visible to the vertex stage.

use std::{collections::HashMap, rc::Rc};

use cgmath::Matrix4;
use log::{debug, warn};
use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, Device, Queue};

use super::{ChunkHandle, RenderBackend, Vertex};

/// Label of the model-matrix bind group layout.
pub const MODEL_BIND_GROUP_LAYOUT: &str = "chunk_model_bind_group_layout";

/// GPU resources of one chunk.
struct GpuChunk {
    /// `None` when the mesh is empty.
    geometry: Option<(Buffer, Buffer)>,
    index_count: u32,
    model_buffer: Buffer,
    model_bind_group: BindGroup,
}

/// [`RenderBackend`] backed by a `wgpu` device.
pub struct WgpuRenderBackend {
    device: Rc<Device>,
    queue: Rc<Queue>,
    model_bind_group_layout: BindGroupLayout,
    chunks: HashMap<ChunkHandle, GpuChunk>,
    pending_draws: Vec<ChunkHandle>,
}

impl WgpuRenderBackend {
    /// Creates a backend on a shared device and queue.
    pub fn new(device: Rc<Device>, queue: Rc<Queue>) -> Self {
        let model_bind_group_layout = Self::create_model_bind_group_layout(&device);
        WgpuRenderBackend {
            device,
            queue,
            model_bind_group_layout,
            chunks: HashMap::new(),
            pending_draws: Vec::new(),
        }
    }

    /// Layout the host must include in its pipeline layout for chunk models.
    pub fn model_bind_group_layout(&self) -> &BindGroupLayout {
        &self.model_bind_group_layout
    }

    /// Vertex layout of chunk meshes.
    pub fn vertex_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        Vertex::desc()
    }

    fn create_model_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(MODEL_BIND_GROUP_LAYOUT),
        })
    }

    fn create_model(&self) -> (Buffer, BindGroup) {
        let identity: [[f32; 4]; 4] = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let model_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Model Buffer"),
                contents: bytemuck::cast_slice(&[identity]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let model_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
            label: Some("chunk_model_bind_group"),
        });
        (model_buffer, model_bind_group)
    }

    fn create_geometry(&self, vertices: &[Vertex], indices: &[u32]) -> Option<(Buffer, Buffer)> {
        if indices.is_empty() {
            return None;
        }
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Some((vertex_buffer, index_buffer))
    }

    /// Replays the draws queued since the last call into `render_pass`.
    ///
    /// # Arguments
    /// * `render_pass` - A pass with the chunk pipeline already set
    /// * `model_group` - Bind group index the pipeline expects the model at
    pub fn record(&mut self, render_pass: &mut wgpu::RenderPass<'_>, model_group: u32) {
        let chunks = &self.chunks;
        for handle in self.pending_draws.drain(..) {
            let Some(chunk) = chunks.get(&handle) else {
                continue;
            };
            let Some((vertex_buffer, index_buffer)) = &chunk.geometry else {
                continue;
            };
            render_pass.set_bind_group(model_group, &chunk.model_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..chunk.index_count, 0, 0..1);
        }
    }
}

impl RenderBackend for WgpuRenderBackend {
    fn upload_mesh(&mut self, handle: ChunkHandle, vertices: &[Vertex], indices: &[u32]) {
        let geometry = self.create_geometry(vertices, indices);
        let index_count = indices.len() as u32;

        if let Some(chunk) = self.chunks.get_mut(&handle) {
            chunk.geometry = geometry;
            chunk.index_count = index_count;
            return;
        }

        let (model_buffer, model_bind_group) = self.create_model();
        self.chunks.insert(
            handle,
            GpuChunk {
                geometry,
                index_count,
                model_buffer,
                model_bind_group,
            },
        );
        debug!(
            "Created GPU buffers for {:?} ({} vertices)",
            handle,
            vertices.len()
        );
    }

    fn draw(&mut self, handle: ChunkHandle, transform: Matrix4<f32>) {
        let Some(chunk) = self.chunks.get(&handle) else {
            warn!("Draw requested for unknown {:?}", handle);
            return;
        };
        let model: [[f32; 4]; 4] = transform.into();
        self.queue
            .write_buffer(&chunk.model_buffer, 0, bytemuck::cast_slice(&[model]));
        self.pending_draws.push(handle);
    }

    fn destroy(&mut self, handle: ChunkHandle) {
        match self.chunks.remove(&handle) {
            Some(chunk) => {
                if let Some((vertex_buffer, index_buffer)) = chunk.geometry {
                    vertex_buffer.destroy();
                    index_buffer.destroy();
                }
                chunk.model_buffer.destroy();
                self.pending_draws.retain(|pending| *pending != handle);
            }
            None => warn!("Destroy requested for unknown {:?}", handle),
        }
    }
}
