//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format shared by the mesher and the GPU
//! backends.

/// A vertex in the voxel rendering pipeline.
///
/// Positions are chunk-local; the chunk's world transform moves them into
/// place at draw time.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// Outward unit normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// UV coordinates into the texture atlas
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
