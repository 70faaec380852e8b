use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene::mat4_identity;

use super::ctx::RenderCtx;
use super::mesh::{Mesh, Vertex};
use super::target::{OffscreenTarget, DEPTH_FORMAT, OFFSCREEN_FORMAT};

/// Default shader used when a component is given a mesh with no custom
/// shader source.
pub const DEFAULT_MESH_SHADER: &str = include_str!("shaders/mesh.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    model: [[f32; 4]; 4],
}

/// What a component draws after its clear.
pub enum ComponentContent {
    /// Clear-only. Also the fallback when mesh/shader setup fails.
    Inert,
    Mesh(MeshBuffers),
    /// Arbitrary caller-recorded drawing.
    Callback(Box<dyn FnMut(&mut wgpu::RenderPass<'_>)>),
}

pub struct MeshBuffers {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    transform_ubo: wgpu::Buffer,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// One native-drawn panel: an offscreen target plus the content rendered
/// into it each frame.
///
/// Content faults are contained: an invalid mesh or a shader that fails
/// validation logs an error and leaves the component inert (it still clears
/// to its background color), never tearing down the frame loop.
pub struct RenderComponent {
    label: String,
    target: OffscreenTarget,
    clear_color: wgpu::Color,
    depth_test: bool,
    transform: [[f32; 4]; 4],
    content: ComponentContent,
}

impl RenderComponent {
    pub fn new(
        device: &wgpu::Device,
        label: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            label: label.into(),
            target: OffscreenTarget::new(device, width, height),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.12,
                a: 1.0,
            },
            depth_test: true,
            transform: mat4_identity(),
            content: ComponentContent::Inert,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    /// Sampled by the compositor.
    pub fn color_view(&self) -> &wgpu::TextureView {
        self.target.color_view()
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        self.target.color_texture()
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Takes effect on the next [`set_mesh`](Self::set_mesh); the pipeline
    /// bakes the depth mode in.
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn set_transform(&mut self, transform: [[f32; 4]; 4]) {
        self.transform = transform;
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.content, ComponentContent::Inert)
    }

    pub fn clear_content(&mut self) {
        self.content = ComponentContent::Inert;
    }

    pub fn set_callback<F>(&mut self, f: F)
    where
        F: FnMut(&mut wgpu::RenderPass<'_>) + 'static,
    {
        self.content = ComponentContent::Callback(Box::new(f));
    }

    /// Installs `mesh` as the component's content, compiling `shader_source`
    /// (or the built-in default) into a pipeline.
    ///
    /// On any failure the previous content is replaced by
    /// [`ComponentContent::Inert`] and the cause is logged.
    pub fn set_mesh(&mut self, ctx: &RenderCtx<'_>, mesh: &Mesh, shader_source: Option<&str>) {
        if let Err(err) = mesh.validate() {
            log::error!("component {}: rejected mesh: {err}", self.label);
            self.content = ComponentContent::Inert;
            return;
        }

        // Shader text comes from disk or script; catch validation failures
        // in an error scope instead of letting them hit the device handler.
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let buffers = self.build_mesh_buffers(ctx, mesh, shader_source);
        let error = pollster::block_on(scope.pop());

        match error {
            None => self.content = ComponentContent::Mesh(buffers),
            Some(err) => {
                log::error!("component {}: shader/pipeline rejected: {err}", self.label);
                self.content = ComponentContent::Inert;
            }
        }
    }

    fn build_mesh_buffers(
        &self,
        ctx: &RenderCtx<'_>,
        mesh: &Mesh,
        shader_source: Option<&str>,
    ) -> MeshBuffers {
        let device = ctx.device;
        let source = shader_source.unwrap_or(DEFAULT_MESH_SHADER);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("oriel mesh shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("oriel mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<TransformUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("oriel mesh pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("oriel mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OFFSCREEN_FORMAT,
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: self.depth_test,
                depth_compare: if self.depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let transform_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("oriel mesh transform ubo"),
            contents: bytemuck::bytes_of(&TransformUniform {
                model: self.transform,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("oriel mesh bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_ubo.as_entire_binding(),
            }],
        });

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("oriel mesh vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("oriel mesh ibo"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffers {
            pipeline,
            bind_group,
            transform_ubo,
            vbo,
            ibo,
            index_count: mesh.index_count(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.target.resize(device, width, height);
    }

    /// Records this component's frame: clear, then draw its content.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, encoder: &mut wgpu::CommandEncoder) {
        if let ComponentContent::Mesh(buffers) = &self.content {
            ctx.queue.write_buffer(
                &buffers.transform_ubo,
                0,
                bytemuck::bytes_of(&TransformUniform {
                    model: self.transform,
                }),
            );
        }

        let mut rpass = self.target.begin_pass(encoder, self.clear_color);

        match &mut self.content {
            ComponentContent::Inert => {}
            ComponentContent::Mesh(buffers) => {
                rpass.set_pipeline(&buffers.pipeline);
                rpass.set_bind_group(0, &buffers.bind_group, &[]);
                rpass.set_vertex_buffer(0, buffers.vbo.slice(..));
                rpass.set_index_buffer(buffers.ibo.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
            ComponentContent::Callback(f) => f(&mut rpass),
        }
    }
}
