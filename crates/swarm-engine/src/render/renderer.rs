use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::frame::{Simulated, Uploaded};
use crate::instances::{InstanceRaw, InstanceStore};

use super::buffers::InstanceBuffers;
use super::geometry::{
    quad_vertices, ProjectionUniform, QuadVertex, QUAD_INDICES, WIRE_INDICES,
};
use super::mirror::MirrorLayout;
use super::mode::RenderMode;
use super::shader::{compile_program, SHAPES_WGSL};
use super::{RenderCtx, RenderTarget};

/// Instanced renderer for circles and rects.
///
/// Every instance is the same unit quad, transformed in the vertex stage by
/// its position, scale and angle. One draw call per frame covers the store.
pub struct ShapeRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    _projection_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    wire_ibo: wgpu::Buffer,

    instances: InstanceBuffers,
}

impl ShapeRenderer {
    /// Compiles the program, builds both pipelines and allocates instance
    /// buffers for `raw.len()` slots.
    ///
    /// Fails when the shader program does not compile.
    pub fn new(
        ctx: &RenderCtx<'_>,
        layout: MirrorLayout,
        projection: Mat4,
        raw: &[InstanceRaw],
    ) -> anyhow::Result<Self> {
        let shader = compile_program(ctx.device, "swarm shapes shader", SHAPES_WGSL)?;

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("swarm shapes bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ProjectionUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("swarm shapes pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let specs = layout.buffers();
        let mut vertex_layouts = vec![QuadVertex::layout()];
        vertex_layouts.extend(specs.iter().map(|s| s.vertex_layout()));

        let make_pipeline = |label: &str, fragment: &str, topology: wgpu::PrimitiveTopology| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &vertex_layouts,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface.format,
                        blend: Some(ctx.surface.blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };
        let fill_pipeline = make_pipeline(
            "swarm shapes fill pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let wire_pipeline = make_pipeline(
            "swarm shapes wire pipeline",
            "fs_wire",
            wgpu::PrimitiveTopology::LineList,
        );

        let projection_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("swarm projection ubo"),
            contents: bytemuck::bytes_of(&ProjectionUniform {
                projection: projection.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("swarm shapes bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("swarm quad vbo"),
            contents: bytemuck::cast_slice(&quad_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("swarm quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let wire_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("swarm wire ibo"),
            contents: bytemuck::cast_slice(&WIRE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances = InstanceBuffers::new(ctx.device, layout, raw);

        Ok(Self {
            fill_pipeline,
            wire_pipeline,
            bind_group,
            _projection_ubo: projection_ubo,
            quad_vbo,
            quad_ibo,
            wire_ibo,
            instances,
        })
    }

    /// Pushes the attributes the simulation marked dirty to the device.
    pub fn upload<L>(
        &mut self,
        queue: &wgpu::Queue,
        store: &InstanceStore<L>,
        simulated: Simulated,
    ) -> Uploaded {
        let raw = store.pack();
        let writes = self.instances.sync(queue, &raw, simulated.dirty());
        log::trace!("uploaded {writes} instance buffer(s) for {} instances", store.count());
        Uploaded::new(store.count() as u32)
    }

    /// Records one instanced draw over the live slots.
    pub fn draw(&self, target: &mut RenderTarget<'_>, uploaded: Uploaded, mode: RenderMode) {
        let count = uploaded.count();
        if count == 0 {
            return;
        }

        let (pipeline, ibo, index_count) = match mode {
            RenderMode::Fill => (&self.fill_pipeline, &self.quad_ibo, QUAD_INDICES.len()),
            RenderMode::Wireframe => (&self.wire_pipeline, &self.wire_ibo, WIRE_INDICES.len()),
        };

        let mut rpass = target.pass("swarm shapes pass", None);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        for (i, buffer) in self.instances.buffers().iter().enumerate() {
            rpass.set_vertex_buffer(i as u32 + 1, buffer.slice(..));
        }
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..index_count as u32, 0, 0..count);
    }
}
