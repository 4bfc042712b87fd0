use std::num::NonZeroU64;

use wgpu::{BufferBindingType, BufferDescriptor};

use crate::{
    context::RenderContext,
    error::{ShaderError, ShaderStage},
    frame::FrameState,
    mesh::Vertex,
    texture::GpuTexture,
};

const VS_MAIN: &str = "vs_main";
const FS_MAIN: &str = "fs_main";

pub const VERTEX_SHADER: &str = include_str!("shaders/quad_vertex.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/quad_fragment.wgsl");

const PROJECTION_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;
const TINT_SIZE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

/// Where each shader input lives in bind group 0.
pub struct QuadBindings;

impl QuadBindings {
    pub const PROJECTION: u32 = 0;
    pub const TINT: u32 = 1;
    pub const TEXTURE: u32 = 2;
    pub const SAMPLER: u32 = 3;
    pub const POSITION: u32 = 0;
}

pub struct QuadPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    projection_uniform: wgpu::Buffer,
    tint_uniform: wgpu::Buffer,
}

impl QuadPipeline {
    pub async fn new(
        context: &RenderContext,
        target_format: wgpu::TextureFormat,
        noise: &GpuTexture,
    ) -> Result<Self, ShaderError> {
        let vertex_shader = context
            .compile_shader(ShaderStage::Vertex, VERTEX_SHADER)
            .await?;
        let fragment_shader = context
            .compile_shader(ShaderStage::Fragment, FRAGMENT_SHADER)
            .await?;

        let (device, _queue) = context.get_device();

        let projection_uniform = Self::create_uniform(device, "projection", PROJECTION_SIZE);
        let tint_uniform = Self::create_uniform(device, "tint", TINT_SIZE);

        let (pipeline, bind_group) = context
            .link(|device| {
                let bind_group_layout = Self::create_bind_group_layout(device);

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: QuadBindings::PROJECTION,
                            resource: projection_uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: QuadBindings::TINT,
                            resource: tint_uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: QuadBindings::TEXTURE,
                            resource: wgpu::BindingResource::TextureView(noise.view()),
                        },
                        wgpu::BindGroupEntry {
                            binding: QuadBindings::SAMPLER,
                            resource: wgpu::BindingResource::Sampler(noise.sampler()),
                        },
                    ],
                    label: Some("quad"),
                });

                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("quad"),
                        bind_group_layouts: &[&bind_group_layout],
                        push_constant_ranges: &[],
                    });

                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("quad"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &vertex_shader,
                        entry_point: VS_MAIN,
                        buffers: &[Vertex::LAYOUT],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &fragment_shader,
                        entry_point: FS_MAIN,
                        targets: &[Some(wgpu::ColorTargetState {
                            format: target_format,
                            blend: None,
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState {
                        count: 1,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                });

                (pipeline, bind_group)
            })
            .await?;

        log::info!("quad shaders compiled and linked");

        Ok(Self {
            pipeline,
            bind_group,
            projection_uniform,
            tint_uniform,
        })
    }

    fn create_uniform(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: QuadBindings::PROJECTION,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(PROJECTION_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: QuadBindings::TINT,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(TINT_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: QuadBindings::TEXTURE,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: QuadBindings::SAMPLER,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This should match the filterable field of the
                    // corresponding Texture entry above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Uploads this frame's projection and tint. Done every frame, changed or not.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, frame: &FrameState, tint: [f32; 3]) {
        queue.write_buffer(
            &self.projection_uniform,
            0,
            bytemuck::cast_slice(&frame.projection.to_cols_array()),
        );
        queue.write_buffer(&self.tint_uniform, 0, bytemuck::cast_slice(&tint_uniform(tint)));
    }

    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

fn tint_uniform(tint: [f32; 3]) -> [f32; 4] {
    [tint[0], tint[1], tint[2], 1.0]
}
