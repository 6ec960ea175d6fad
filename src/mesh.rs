//! Unit-cube vertex streams and their GPU buffers.
//!
//! Every drawable in the scene is the same cube spanning `[0, 1]^3`, drawn
//! non-indexed as 36 vertices (12 triangles, counter-clockwise front faces).
//! Two streams exist:
//!
//! | Stream   | Vertex         | Stride | Attributes                          |
//! |----------|----------------|--------|-------------------------------------|
//! | detailed | [`Vertex3d`]   | 32     | position (0), normal (1), uv (2)    |
//! | fast     | [`FastVertex`] | 12     | position (0)                        |
//!
//! The fast stream is for the large environment volumes; its shader derives
//! texture coordinates from the position instead of reading them.

use crate::gpu::GpuContext;
use crate::primitive::CubeVariant;

/// Vertices per cube draw.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// A vertex with position, normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A position-only vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FastVertex {
    pub position: [f32; 3],
}

impl FastVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<FastVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };
}

struct Face {
    normal: [f32; 3],
    /// Counter-clockwise seen from outside, starting at uv (0, 0).
    corners: [[f32; 3]; 4],
}

#[rustfmt::skip]
const FACES: [Face; 6] = [
    // Front (Z+)
    Face { normal: [ 0.0,  0.0,  1.0], corners: [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]] },
    // Back (Z-)
    Face { normal: [ 0.0,  0.0, -1.0], corners: [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]] },
    // Top (Y+)
    Face { normal: [ 0.0,  1.0,  0.0], corners: [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] },
    // Bottom (Y-)
    Face { normal: [ 0.0, -1.0,  0.0], corners: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]] },
    // Right (X+)
    Face { normal: [ 1.0,  0.0,  0.0], corners: [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]] },
    // Left (X-)
    Face { normal: [-1.0,  0.0,  0.0], corners: [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]] },
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// The detailed stream: per-face normals, each face mapping the full texture.
pub fn detailed_cube_vertices() -> Vec<Vertex3d> {
    FACES
        .iter()
        .flat_map(|face| {
            QUAD_TRIANGLES
                .iter()
                .map(move |&i| Vertex3d::new(face.corners[i], face.normal, QUAD_UVS[i]))
        })
        .collect()
}

/// The fast stream: the same triangles, positions only.
pub fn fast_cube_vertices() -> Vec<FastVertex> {
    FACES
        .iter()
        .flat_map(|face| {
            QUAD_TRIANGLES.iter().map(move |&i| FastVertex {
                position: face.corners[i],
            })
        })
        .collect()
}

/// One cube vertex stream uploaded to the GPU.
#[derive(Debug)]
pub struct CubeMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) vertex_count: u32,
}

impl CubeMesh {
    pub fn new(gpu: &GpuContext, variant: CubeVariant) -> Self {
        use wgpu::util::DeviceExt;

        let (label, contents): (&str, Vec<u8>) = match variant {
            CubeVariant::Detailed => (
                "Detailed Cube Vertex Buffer",
                bytemuck::cast_slice(&detailed_cube_vertices()).to_vec(),
            ),
            CubeVariant::Fast => (
                "Fast Cube Vertex Buffer",
                bytemuck::cast_slice(&fast_cube_vertices()).to_vec(),
            ),
        };

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: &contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self {
            vertex_buffer,
            vertex_count: CUBE_VERTEX_COUNT,
        }
    }
}
