//! GPU render target for cube primitives.
//!
//! [`CubePass`] implements [`RenderTarget`]: a composed frame queues its
//! uniforms and draws here, and [`CubePass::render`] submits them in one
//! render pass.
//!
//! # Bind groups
//!
//! - **Group 0**: frame uniforms (view, projection, global rotation)
//! - **Group 1**: per-draw model uniforms, one slot per draw selected by a
//!   dynamic offset, so every draw carries its own model matrix, colour, and
//!   material code
//! - **Group 2**: texture unit A and B with their samplers

use std::num::NonZeroU64;

use crate::gpu::GpuContext;
use crate::mesh::{CubeMesh, FastVertex, Vertex3d};
use crate::primitive::{CubeVariant, FrameUniforms, Primitive, RenderTarget};
use crate::texture::Texture;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
const INITIAL_DRAW_CAPACITY: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniformsGpu {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    global_rotation: [[f32; 4]; 4],
}

impl From<&FrameUniforms> for FrameUniformsGpu {
    fn from(uniforms: &FrameUniforms) -> Self {
        Self {
            view: uniforms.view.to_cols_array_2d(),
            projection: uniforms.projection.to_cols_array_2d(),
            global_rotation: uniforms.global_rotation.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    material: i32,
    _padding: [i32; 3],
}

impl From<&Primitive> for ModelUniforms {
    fn from(primitive: &Primitive) -> Self {
        Self {
            model: primitive.model_matrix().to_cols_array_2d(),
            color: primitive.color.to_array(),
            material: primitive.material.code(),
            _padding: [0; 3],
        }
    }
}

/// Renders queued cube draws with depth testing.
pub struct CubePass {
    detailed_pipeline: wgpu::RenderPipeline,
    fast_pipeline: wgpu::RenderPipeline,
    detailed_mesh: CubeMesh,
    fast_mesh: CubeMesh,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    model_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    uniforms: FrameUniforms,
    clear_requested: bool,
    draws: Vec<Primitive>,
}

impl CubePass {
    /// Builds both pipelines. Textures start as 1x1 white until
    /// [`set_textures`](Self::set_textures) is called.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        // Frame uniform buffer (group 0)
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniformsGpu>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
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
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Model uniform buffer (group 1)
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ModelUniforms>() as u64),
                },
                count: None,
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let model_stride = model_stride(alignment);
        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(device, &model_layout, model_stride, INITIAL_DRAW_CAPACITY);

        // Texture bind group layout (group 2)
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let blank = Texture::from_rgba(gpu, &[255, 255, 255, 255], 1, 1, "Blank Texture");
        let texture_bind_group = Self::create_texture_bind_group(gpu, &texture_layout, &blank, &blank);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |label: &str,
                               vs: &str,
                               fs: &str,
                               layout: wgpu::VertexBufferLayout<'static>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                // No culling: the skybox is seen from inside.
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let detailed_pipeline = create_pipeline(
            "Detailed Cube Pipeline",
            "vs_detailed",
            "fs_detailed",
            Vertex3d::LAYOUT,
        );
        let fast_pipeline =
            create_pipeline("Fast Cube Pipeline", "vs_fast", "fs_fast", FastVertex::LAYOUT);

        log::debug!("cube pass ready (model stride {model_stride} bytes)");

        Self {
            detailed_pipeline,
            fast_pipeline,
            detailed_mesh: CubeMesh::new(gpu, CubeVariant::Detailed),
            fast_mesh: CubeMesh::new(gpu, CubeVariant::Fast),
            frame_buffer,
            frame_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity: INITIAL_DRAW_CAPACITY,
            texture_layout,
            texture_bind_group,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            uniforms: FrameUniforms::default(),
            clear_requested: false,
            draws: Vec::new(),
        }
    }

    /// Binds texture units A and B.
    pub fn set_textures(&mut self, gpu: &GpuContext, texture_a: &Texture, texture_b: &Texture) {
        self.texture_bind_group =
            Self::create_texture_bind_group(gpu, &self.texture_layout, texture_a, texture_b);
    }

    fn create_texture_bind_group(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        texture_a: &Texture,
        texture_b: &Texture,
    ) -> wgpu::BindGroup {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_a.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture_a.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&texture_b.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&texture_b.sampler),
                },
            ],
        })
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn ensure_model_capacity(&mut self, gpu: &GpuContext, draws: usize) {
        if draws <= self.model_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("growing model uniforms to {capacity} draws");
        let (buffer, bind_group) =
            Self::create_model_buffer(&gpu.device, &self.model_layout, self.model_stride, capacity);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Encodes and submits everything queued since the last call.
    pub fn render(&mut self, gpu: &GpuContext, target: &wgpu::TextureView) {
        self.ensure_depth_size(gpu);
        self.ensure_model_capacity(gpu, self.draws.len());

        gpu.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniformsGpu::from(&self.uniforms)),
        );

        if !self.draws.is_empty() {
            let stride = self.model_stride as usize;
            let mut staging = vec![0u8; stride * self.draws.len()];
            for (slot, primitive) in staging.chunks_exact_mut(stride).zip(&self.draws) {
                let uniforms = ModelUniforms::from(primitive);
                let bytes = bytemuck::bytes_of(&uniforms);
                slot[..bytes.len()].copy_from_slice(bytes);
            }
            gpu.queue.write_buffer(&self.model_buffer, 0, &staging);
        }

        let (color_load, depth_load) = if self.clear_requested {
            (wgpu::LoadOp::Clear(CLEAR_COLOR), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(2, &self.texture_bind_group, &[]);

            let mut bound = None;
            for (index, primitive) in self.draws.iter().enumerate() {
                if bound != Some(primitive.variant) {
                    let (pipeline, mesh) = match primitive.variant {
                        CubeVariant::Detailed => (&self.detailed_pipeline, &self.detailed_mesh),
                        CubeVariant::Fast => (&self.fast_pipeline, &self.fast_mesh),
                    };
                    pass.set_pipeline(pipeline);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    bound = Some(primitive.variant);
                }
                let offset = (index as u64 * self.model_stride) as u32;
                pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                let count = match primitive.variant {
                    CubeVariant::Detailed => self.detailed_mesh.vertex_count,
                    CubeVariant::Fast => self.fast_mesh.vertex_count,
                };
                pass.draw(0..count, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        log::trace!("submitted {} cube draws", self.draws.len());
        self.draws.clear();
        self.clear_requested = false;
    }
}

impl RenderTarget for CubePass {
    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        self.uniforms = *uniforms;
        self.draws.clear();
    }

    fn clear_frame(&mut self) {
        self.clear_requested = true;
    }

    fn draw_cube(&mut self, primitive: &Primitive) {
        self.draws.push(*primitive);
    }
}

/// Bytes between consecutive model uniform slots.
fn model_stride(alignment: u64) -> u64 {
    let size = std::mem::size_of::<ModelUniforms>() as u64;
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}
